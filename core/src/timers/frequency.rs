//! Frequency timer: pulses at a fixed rate
//!
//! `current_time` is an accumulator against `1 / ticks_per_second`. A pass
//! that finds the accumulator over the threshold pulses once and subtracts
//! one threshold; otherwise it accumulates the delta. Long frames therefore
//! never produce a burst of catch-up pulses, the surplus carries over.

use std::rc::Rc;

use crate::tick::TickRegistry;

use super::error::TimerError;
use super::timer::{Sealed, TickOutcome, Timer, TimerCore, TimerKind};

#[derive(Debug, Clone, Copy)]
pub struct Frequency {
    ticks_per_second: u32,
    threshold: f64,
}

impl Frequency {
    fn new(ticks_per_second: u32) -> Result<Self, TimerError> {
        if ticks_per_second == 0 {
            return Err(TimerError::InvalidTickRate { ticks_per_second });
        }
        Ok(Self {
            ticks_per_second,
            threshold: 1.0 / f64::from(ticks_per_second),
        })
    }
}

impl Sealed for Frequency {}

impl TimerKind for Frequency {
    const NAME: &'static str = "frequency";

    fn start_value(&self, _core: &TimerCore) -> f64 {
        0.0
    }

    fn advance(&mut self, core: &mut TimerCore, delta: f64) -> TickOutcome {
        if core.current_time() >= self.threshold {
            core.set_current_time(core.current_time() - self.threshold);
            TickOutcome {
                update: Some(core.current_time()),
                pulsed: true,
                stopped: false,
            }
        } else {
            core.set_current_time(core.current_time() + delta);
            TickOutcome::default()
        }
    }

    fn is_finished(&self, core: &TimerCore) -> bool {
        !core.is_running()
    }
}

pub type FrequencyTimer = Timer<Frequency>;

impl Timer<Frequency> {
    pub fn new(registry: &Rc<TickRegistry>, ticks_per_second: u32) -> Result<Self, TimerError> {
        let kind = Frequency::new(ticks_per_second)?;
        let threshold = kind.threshold;
        Ok(Self::from_parts(registry, kind, threshold, 0.0))
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.with_body(|_, kind| kind.ticks_per_second)
    }

    /// Seconds between pulses.
    pub fn time_threshold(&self) -> f64 {
        self.with_body(|_, kind| kind.threshold)
    }

    /// Change the rate and clear the accumulator.
    pub fn reset_ticks_per_second(&self, ticks_per_second: u32) -> Result<(), TimerError> {
        let next = Frequency::new(ticks_per_second)?;
        self.with_body(|core, kind| {
            *kind = next;
            core.set_initial_time(next.threshold);
        });
        self.reset();
        Ok(())
    }

    /// Subscribe to pulses.
    pub fn on_tick(&self, mut listener: impl FnMut() + 'static) {
        self.shared.events.ticked.subscribe(move |()| listener());
    }
}

//! Countdown timer: counts `current_time` down to zero, then auto-stops

use std::rc::Rc;

use crate::tick::TickRegistry;

use super::error::{TimerError, check_duration};
use super::timer::{Sealed, TickOutcome, Timer, TimerCore, TimerKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown;

impl Sealed for Countdown {}

impl TimerKind for Countdown {
    const NAME: &'static str = "countdown";

    fn start_value(&self, core: &TimerCore) -> f64 {
        core.initial_time()
    }

    fn advance(&mut self, core: &mut TimerCore, delta: f64) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if core.current_time() > 0.0 {
            core.set_current_time((core.current_time() - delta).max(0.0));
            outcome.update = Some(core.current_time());
        }

        // Also catches a timer started with nothing left
        if core.current_time() <= 0.0 {
            core.set_current_time(0.0);
            outcome.stopped = core.finish();
        }

        outcome
    }

    fn is_finished(&self, core: &TimerCore) -> bool {
        core.current_time() <= 0.0
    }
}

pub type CountdownTimer = Timer<Countdown>;

impl Timer<Countdown> {
    /// Countdown of `duration` seconds, Idle until started.
    pub fn new(registry: &Rc<TickRegistry>, duration: f64) -> Result<Self, TimerError> {
        let duration = check_duration(duration)?;
        Ok(Self::from_parts(registry, Countdown, duration, duration))
    }

    /// Countdown whose total is `duration` but which currently has only
    /// `remaining` seconds left. Used to materialise persisted timers.
    pub(crate) fn with_remaining(
        registry: &Rc<TickRegistry>,
        duration: f64,
        remaining: f64,
    ) -> Result<Self, TimerError> {
        let duration = check_duration(duration)?;
        let remaining = check_duration(remaining)?;
        Ok(Self::from_parts(registry, Countdown, duration, remaining))
    }

    /// Replace the duration and restore `current_time` to it.
    pub fn reset_with(&self, duration: f64) -> Result<(), TimerError> {
        let duration = check_duration(duration)?;
        self.with_body(|core, _| core.set_initial_time(duration));
        self.reset();
        Ok(())
    }

    /// Seconds left; alias for `current_time` that reads better at call sites.
    pub fn remaining(&self) -> f64 {
        self.current_time()
    }

    /// Start with `remaining` seconds left instead of the full duration.
    pub fn start_with_remaining(&self, remaining: f64) -> Result<bool, TimerError> {
        let remaining = check_duration(remaining)?;
        Ok(self.start_from(remaining))
    }
}

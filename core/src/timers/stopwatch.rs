//! Stopwatch: unbounded elapsed time

use std::rc::Rc;

use crate::tick::TickRegistry;

use super::timer::{Sealed, TickOutcome, Timer, TimerCore, TimerKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch;

impl Sealed for Stopwatch {}

impl TimerKind for Stopwatch {
    const NAME: &'static str = "stopwatch";

    fn start_value(&self, _core: &TimerCore) -> f64 {
        0.0
    }

    fn advance(&mut self, core: &mut TimerCore, delta: f64) -> TickOutcome {
        core.set_current_time(core.current_time() + delta);
        TickOutcome {
            update: Some(core.current_time()),
            ..Default::default()
        }
    }

    fn is_finished(&self, _core: &TimerCore) -> bool {
        false
    }
}

pub type StopwatchTimer = Timer<Stopwatch>;

impl Timer<Stopwatch> {
    pub fn new(registry: &Rc<TickRegistry>) -> Self {
        Self::from_parts(registry, Stopwatch, 0.0, 0.0)
    }

    /// Seconds measured since the last start or reset.
    pub fn elapsed(&self) -> f64 {
        self.current_time()
    }
}

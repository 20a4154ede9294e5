//! Wall-clock time source
//!
//! Countdown persistence stores absolute unix boundaries, so resuming a
//! timer needs "now" in the same unit. `SystemClock` reads the real clock;
//! `ManualClock` only moves when told to, which keeps restart scenarios
//! deterministic in tests and simulations.

use std::cell::Cell;
use std::rc::Rc;

/// Source of the current unix time in whole seconds.
pub trait WallClock {
    fn now_unix(&self) -> i64;
}

/// Real UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(now_unix: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_unix)),
        }
    }

    pub fn set(&self, now_unix: i64) {
        self.now.set(now_unix);
    }

    /// Move forward by `secs`, saturating on overflow.
    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl WallClock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let view = clock.clone();
        clock.advance(40);
        assert_eq!(view.now_unix(), 1_040);

        view.set(5);
        assert_eq!(clock.now_unix(), 5);
    }

    #[test]
    fn manual_clock_saturates() {
        let clock = ManualClock::new(i64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now_unix(), i64::MAX);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_unix() > 1_577_836_800);
    }
}

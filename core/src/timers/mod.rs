//! Timer system
//!
//! This module provides:
//! - **Timer**: shared state machine (start/stop/pause/resume/reset) that
//!   registers itself with a `TickRegistry` while active
//! - **Variants**: countdown (to zero), stopwatch (unbounded elapsed time),
//!   frequency (fixed-rate pulses)
//! - **Events**: per-timer subscriber lists for start, stop, update, and tick
//!
//! # Lifecycle
//!
//! 1. Timer constructed Idle against one registry (frame or fixed)
//! 2. `start()` registers it; the registry ticks it every pass
//! 3. `stop()`, auto-stop on completion, or `dispose()` deregisters it

mod countdown;
mod error;
mod events;
mod frequency;
mod stopwatch;
mod timer;

#[cfg(test)]
mod timer_tests;

pub use countdown::{Countdown, CountdownTimer};
pub use error::TimerError;
pub use events::{Listeners, TimerEvents};
pub use frequency::{Frequency, FrequencyTimer};
pub use stopwatch::{Stopwatch, StopwatchTimer};
pub use timer::{TickOutcome, Timer, TimerCore, TimerKind, TimerState};

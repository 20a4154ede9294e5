//! Countdown schedule
//!
//! `ScheduleManager` owns keyed countdown timers, restores them from a
//! persistence backend at construction, and writes them back in bulk when
//! disposed.

mod error;
mod manager;


pub use error::ScheduleError;
pub use manager::ScheduleManager;

//! Storage-agnostic persistence contract

use hourglass_types::BackendKind;

use super::record::CountdownTimerRecord;

/// Save/load/clear contract shared by every storage medium.
///
/// Implementations catch and log their own failures: a save or clear that
/// goes wrong returns `false`, a load that goes wrong returns an empty set.
/// A backend instance owns one logical slot; two live schedules must not
/// share one.
pub trait TimerBackend {
    fn kind(&self) -> BackendKind;

    /// Overwrite the stored set with `records`. An empty slice clears.
    fn save_timers(&mut self, records: &[CountdownTimerRecord]) -> bool;

    /// Stored set, or empty if nothing was saved or it could not be read.
    fn load_timers(&self) -> Vec<CountdownTimerRecord>;

    /// Delete the stored artifact. Idempotent.
    fn clear_timers(&mut self) -> bool;

    /// True iff `load_timers` would return a non-empty set.
    fn has_saved_timers(&self) -> bool {
        !self.load_timers().is_empty()
    }
}

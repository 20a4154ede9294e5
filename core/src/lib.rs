pub mod clock;
pub mod context;
pub mod persistence;
pub mod schedule;
pub mod tick;
pub mod timers;

// Re-exports for convenience
pub use clock::{ManualClock, SystemClock, WallClock};
pub use context::{ScheduleConfig, ScheduleConfigExt};
pub use persistence::{
    BackendKind, CountdownTimerRecord, FileBackend, KeyValueBackend, KeyValueStore, MemoryStore,
    TimerBackend, TomlStore, create_backend,
};
pub use schedule::{ScheduleError, ScheduleManager};
pub use tick::{TickContext, TickHandle, TickHandler, TickKind, TickRegistry};
pub use timers::{CountdownTimer, FrequencyTimer, StopwatchTimer, TimerError, TimerState};

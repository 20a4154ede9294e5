mod config;

pub use config::{BackendKind, ScheduleConfig, ScheduleConfigExt, TickCadence};

use hourglass_core::{ScheduleConfig, ScheduleConfigExt, ScheduleManager, TickContext};

/// Holds all state for one CLI session.
///
/// Everything lives on the host loop's thread; nothing here is shared
/// across threads.
pub struct CliContext {
    pub config: ScheduleConfig,
    pub ticks: TickContext,
    pub schedule: ScheduleManager,
}

impl CliContext {
    pub fn new() -> Self {
        Self::with_config(ScheduleConfig::load())
    }

    pub fn with_config(config: ScheduleConfig) -> Self {
        let ticks = TickContext::from_config(&config);
        let schedule = ScheduleManager::from_config(&ticks, &config);
        Self {
            config,
            ticks,
            schedule,
        }
    }

    /// Persist all countdowns. Consumes the session.
    pub fn shutdown(self) -> bool {
        self.schedule.dispose()
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

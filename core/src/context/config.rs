//! Schedule configuration persistence
//!
//! Re-exports the shared config types from hourglass-types and adds
//! confy-backed load/store.

pub use hourglass_types::{BackendKind, ScheduleConfig, TickCadence};

const APP_NAME: &str = "hourglass";
const CONFIG_NAME: &str = "config";

/// Extension trait for ScheduleConfig persistence
pub trait ScheduleConfigExt: Sized {
    /// Stored config, or defaults when missing or unreadable.
    fn load() -> Self;
    fn save(&self) -> Result<(), confy::ConfyError>;
    fn config_path() -> Option<std::path::PathBuf>;
}

impl ScheduleConfigExt for ScheduleConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    fn config_path() -> Option<std::path::PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let config = ScheduleConfig {
            backend: BackendKind::KeyValue,
            cadence: TickCadence::Fixed,
            fixed_step_hz: 30.0,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("backend = \"key_value\""));

        let parsed: ScheduleConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let parsed: ScheduleConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, ScheduleConfig::default());
    }
}

//! Shared configuration types for hourglass
//!
//! This crate contains serializable configuration types shared between
//! the timer engine (hourglass-core) and hosts that drive it (hourglass-cli).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Persistence Backend Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Storage medium used to persist countdown timers between runs.
///
/// Both backends share one JSON record shape, so switching between them
/// needs no migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// One JSON document on the filesystem
    #[default]
    File,
    /// One entry in a flat key-value store
    KeyValue,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::KeyValue => "key-value",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch Cadence
// ─────────────────────────────────────────────────────────────────────────────

/// Which dispatch pass managed timers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickCadence {
    /// Driven once per rendered frame with a variable delta
    #[default]
    Frame,
    /// Driven at a fixed step with a constant delta
    Fixed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule Config
// ─────────────────────────────────────────────────────────────────────────────

fn default_fixed_step_hz() -> f64 {
    50.0
}

fn default_frame_rate_hz() -> f64 {
    60.0
}

/// Configuration for a schedule: where timers persist and how fast the
/// host drives the two dispatch passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Timer file used by the file backend (platform data dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_path: Option<PathBuf>,

    /// Store file used by the key-value backend (platform data dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub cadence: TickCadence,

    /// Fixed-step dispatches per second
    #[serde(default = "default_fixed_step_hz")]
    pub fixed_step_hz: f64,

    /// Frame dispatches per second requested from the host loop
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            save_path: None,
            store_path: None,
            cadence: TickCadence::default(),
            fixed_step_hz: default_fixed_step_hz(),
            frame_rate_hz: default_frame_rate_hz(),
        }
    }
}

impl ScheduleConfig {
    /// Seconds between two fixed-step dispatches.
    ///
    /// Falls back to the default rate when the configured one is not a
    /// positive finite number.
    pub fn fixed_step(&self) -> f64 {
        1.0 / sanitize_rate(self.fixed_step_hz, default_fixed_step_hz())
    }

    /// Seconds between two frame dispatches.
    pub fn frame_interval(&self) -> f64 {
        1.0 / sanitize_rate(self.frame_rate_hz, default_frame_rate_hz())
    }
}

fn sanitize_rate(rate: f64, fallback: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_file_backend_and_frame_cadence() {
        let config = ScheduleConfig::default();
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.cadence, TickCadence::Frame);
        assert!((config.fixed_step() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn invalid_rates_fall_back_to_defaults() {
        let config = ScheduleConfig {
            fixed_step_hz: 0.0,
            frame_rate_hz: f64::NAN,
            ..Default::default()
        };
        assert!((config.fixed_step() - 0.02).abs() < 1e-12);
        assert!((config.frame_interval() - 1.0 / 60.0).abs() < 1e-12);
    }
}

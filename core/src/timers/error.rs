//! Error types for timer construction

use thiserror::Error;

/// Rejected timer configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    #[error("invalid timer duration {duration}: must be finite and non-negative")]
    InvalidDuration { duration: f64 },

    #[error("invalid tick rate {ticks_per_second}: must be at least 1 per second")]
    InvalidTickRate { ticks_per_second: u32 },
}

/// Validate a duration in seconds.
pub(crate) fn check_duration(duration: f64) -> Result<f64, TimerError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(duration)
    } else {
        Err(TimerError::InvalidDuration { duration })
    }
}

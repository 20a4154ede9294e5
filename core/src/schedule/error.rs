//! Error types for schedule operations

use thiserror::Error;

use crate::timers::TimerError;

/// Rejected schedule request. Only programmer errors surface here;
/// storage failures are absorbed by the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("countdown key must not be empty")]
    EmptyKey,

    #[error("no countdown registered under {key}")]
    UnknownKey { key: String },

    #[error("invalid duration {duration} for countdown {key}")]
    InvalidDuration { key: String, duration: f64 },

    #[error("invalid tier {tier} for countdown {key}: expected 0..={tier_count}")]
    InvalidTier {
        key: String,
        tier: i32,
        tier_count: i32,
    },

    #[error(transparent)]
    Timer(#[from] TimerError),
}

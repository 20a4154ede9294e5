//! Persisted countdown record

use serde::{Deserialize, Serialize};

/// One countdown timer as stored on disk.
///
/// Boundaries are absolute unix seconds so that time spent with the
/// process closed is accounted for on resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTimerRecord {
    pub key: String,
    pub start_time_unix: i64,
    pub end_time_unix: i64,
    /// Full duration in seconds, independent of time already elapsed
    pub total_duration: f64,
    #[serde(default)]
    pub tier_count: i32,
    #[serde(default)]
    pub current_tier: i32,
}

impl CountdownTimerRecord {
    /// Record for a countdown of `duration` seconds starting at `now_unix`.
    pub fn starting_at(key: impl Into<String>, now_unix: i64, duration: f64) -> Self {
        Self {
            key: key.into(),
            start_time_unix: now_unix,
            end_time_unix: now_unix.saturating_add(whole_seconds(duration)),
            total_duration: duration,
            tier_count: 0,
            current_tier: 0,
        }
    }

    /// Seconds left at `now_unix`, never negative.
    pub fn remaining_at(&self, now_unix: i64) -> f64 {
        self.end_time_unix.saturating_sub(now_unix).max(0) as f64
    }

    /// Move the end boundary so that `remaining` seconds are left at
    /// `now_unix`. The end never precedes the start.
    pub fn set_remaining(&mut self, now_unix: i64, remaining: f64) {
        let end = now_unix.saturating_add(whole_seconds(remaining.max(0.0)));
        self.end_time_unix = end.max(self.start_time_unix);
    }

    /// Describe the first broken invariant, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err("empty key".to_string());
        }
        if self.end_time_unix < self.start_time_unix {
            return Err(format!(
                "end {} precedes start {}",
                self.end_time_unix, self.start_time_unix
            ));
        }
        if !(self.total_duration.is_finite() && self.total_duration >= 0.0) {
            return Err(format!("invalid total duration {}", self.total_duration));
        }
        if self.current_tier < 0 || self.current_tier > self.tier_count {
            return Err(format!(
                "tier {} outside 0..={}",
                self.current_tier, self.tier_count
            ));
        }
        Ok(())
    }
}

fn whole_seconds(secs: f64) -> i64 {
    secs.round() as i64
}

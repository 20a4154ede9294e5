//! Keyed countdown orchestration with restart-safe persistence
//!
//! # Lifecycle
//!
//! 1. Construction loads every persisted record and materialises an Idle
//!    countdown for it. Nothing starts yet, so callers can subscribe before
//!    a reloaded timer could complete.
//! 2. `start_loaded_countdown_timer` subtracts the wall-clock time that
//!    passed while the process was closed, then starts the timer.
//! 3. `dispose` (or dropping the manager) writes the full set back.
//!    This is the only point where live state reaches storage.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use hourglass_types::{BackendKind, ScheduleConfig};

use crate::clock::{SystemClock, WallClock};
use crate::persistence::{CountdownTimerRecord, TimerBackend, create_backend};
use crate::tick::{TickContext, TickRegistry};
use crate::timers::{CountdownTimer, TimerState};

use super::error::ScheduleError;

struct ScheduledCountdown {
    /// Insertion order, used when writing the set back
    seq: u64,
    timer: CountdownTimer,
    record: CountdownTimerRecord,
    /// Restored from storage and not started yet. Shared with a start
    /// listener on the timer.
    awaiting_resume: Rc<Cell<bool>>,
}

impl ScheduledCountdown {
    /// Whether this is a restored timer nobody has started.
    ///
    /// A restored timer started directly through its handle stops counting
    /// as pending, even if it was stopped again since.
    fn is_awaiting_resume(&self) -> bool {
        if self.awaiting_resume.get() && self.timer.state() != TimerState::Idle {
            tracing::debug!(key = %self.record.key, "restored countdown was started directly");
            self.awaiting_resume.set(false);
        }
        self.awaiting_resume.get()
    }

    /// Record reflecting the live timer at `now_unix`.
    fn snapshot(&self, now_unix: i64) -> CountdownTimerRecord {
        let mut record = self.record.clone();
        // A restored timer that never started still has a valid absolute end.
        if !self.is_awaiting_resume() {
            record.set_remaining(now_unix, self.timer.remaining());
        }
        record
    }
}

pub struct ScheduleManager {
    registry: Rc<TickRegistry>,
    backend: Box<dyn TimerBackend>,
    clock: Rc<dyn WallClock>,
    timers: HashMap<String, ScheduledCountdown>,
    next_seq: u64,
    disposed: bool,
}

impl ScheduleManager {
    /// Create a manager whose countdowns tick on `registry`, restoring any
    /// timers `backend` holds.
    pub fn new(
        registry: Rc<TickRegistry>,
        backend: Box<dyn TimerBackend>,
        clock: Rc<dyn WallClock>,
    ) -> Self {
        let mut manager = Self {
            registry,
            backend,
            clock,
            timers: HashMap::new(),
            next_seq: 0,
            disposed: false,
        };
        manager.restore();
        manager
    }

    /// Backend, cadence, and paths from `config`; real wall clock.
    pub fn from_config(ctx: &TickContext, config: &ScheduleConfig) -> Self {
        Self::new(
            Rc::clone(ctx.registry(config.cadence)),
            create_backend(config),
            Rc::new(SystemClock),
        )
    }

    fn restore(&mut self) {
        let records = self.backend.load_timers();
        if records.is_empty() {
            return;
        }

        let now = self.clock.now_unix();
        for record in records {
            let remaining = record.remaining_at(now);
            let timer =
                match CountdownTimer::with_remaining(&self.registry, record.total_duration, remaining) {
                    Ok(timer) => timer,
                    Err(e) => {
                        tracing::warn!(key = %record.key, error = %e, "skipping unrestorable countdown");
                        continue;
                    }
                };

            let awaiting_resume = Rc::new(Cell::new(true));
            {
                let awaiting_resume = Rc::clone(&awaiting_resume);
                timer.on_timer_start(move || awaiting_resume.set(false));
            }

            tracing::debug!(key = %record.key, remaining, "countdown restored");
            let key = record.key.clone();
            let seq = self.bump_seq();
            self.timers.insert(
                key,
                ScheduledCountdown {
                    seq,
                    timer,
                    record,
                    awaiting_resume,
                },
            );
        }

        tracing::info!(count = self.timers.len(), "restored persisted countdowns");
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    // ─── Creation ────────────────────────────────────────────────────────────

    /// Start a countdown under `key`, or return the one already there.
    ///
    /// Only a running or paused countdown, or a restored one still waiting
    /// for `start_loaded_countdown_timer`, is returned as is. A stopped or
    /// finished countdown under `key` is replaced by a fresh one.
    pub fn start_countdown_timer(
        &mut self,
        key: &str,
        duration: f64,
    ) -> Result<CountdownTimer, ScheduleError> {
        self.start_tiered_countdown_timer(key, duration, 0)
    }

    /// Like `start_countdown_timer`, recording `tier_count` tiers starting
    /// at tier 0. Tiers are stored, never advanced automatically.
    pub fn start_tiered_countdown_timer(
        &mut self,
        key: &str,
        duration: f64,
        tier_count: i32,
    ) -> Result<CountdownTimer, ScheduleError> {
        if key.is_empty() {
            return Err(ScheduleError::EmptyKey);
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(ScheduleError::InvalidDuration {
                key: key.to_string(),
                duration,
            });
        }
        if tier_count < 0 {
            return Err(ScheduleError::InvalidTier {
                key: key.to_string(),
                tier: 0,
                tier_count,
            });
        }

        if let Some(existing) = self.timers.get(key) {
            if existing.timer.state().is_active() || existing.is_awaiting_resume() {
                tracing::debug!(key, "countdown already scheduled");
                return Ok(existing.timer.clone());
            }
        }

        let timer = CountdownTimer::new(&self.registry, duration)?;
        let mut record = CountdownTimerRecord::starting_at(key, self.clock.now_unix(), duration);
        record.tier_count = tier_count;

        let seq = self.bump_seq();
        if let Some(old) = self.timers.insert(
            key.to_string(),
            ScheduledCountdown {
                seq,
                timer: timer.clone(),
                record,
                awaiting_resume: Rc::new(Cell::new(false)),
            },
        ) {
            tracing::debug!(key, state = ?old.timer.state(), "replacing inactive countdown");
            old.timer.dispose();
        }

        timer.start();
        tracing::info!(key, duration, "countdown started");
        Ok(timer)
    }

    /// Start a countdown restored from storage, with the wall-clock time
    /// spent since it was saved already subtracted.
    ///
    /// Returns `None` for an unknown key, and the existing timer if it was
    /// already started.
    pub fn start_loaded_countdown_timer(&mut self, key: &str) -> Option<CountdownTimer> {
        let now = self.clock.now_unix();
        let Some(entry) = self.timers.get_mut(key) else {
            tracing::debug!(key, "no restored countdown to resume");
            return None;
        };

        if !entry.is_awaiting_resume() {
            return Some(entry.timer.clone());
        }

        let remaining = entry.record.remaining_at(now);
        match entry.timer.start_with_remaining(remaining) {
            Ok(_) => {
                entry.awaiting_resume.set(false);
                tracing::info!(key, remaining, "countdown resumed");
                Some(entry.timer.clone())
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to resume countdown");
                None
            }
        }
    }

    // ─── Lookup ──────────────────────────────────────────────────────────────

    pub fn has_countdown_timer(&self, key: &str) -> bool {
        self.timers.contains_key(key)
    }

    pub fn get_countdown_timer(&self, key: &str) -> Option<&CountdownTimer> {
        self.timers.get(key).map(|entry| &entry.timer)
    }

    /// Restored from storage and waiting for `start_loaded_countdown_timer`.
    pub fn is_loaded_pending(&self, key: &str) -> bool {
        self.timers.get(key).is_some_and(ScheduledCountdown::is_awaiting_resume)
    }

    /// Record as it would be persisted right now.
    pub fn countdown_record(&self, key: &str) -> Option<CountdownTimerRecord> {
        let now = self.clock.now_unix();
        self.timers.get(key).map(|entry| entry.snapshot(now))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let mut entries: Vec<_> = self.timers.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries.into_iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    // ─── Mutation ────────────────────────────────────────────────────────────

    /// Stop and forget the countdown under `key`. Storage is updated on the
    /// next bulk save, not now.
    pub fn remove_countdown_timer(&mut self, key: &str) -> bool {
        let Some(entry) = self.timers.remove(key) else {
            return false;
        };
        entry.timer.stop();
        tracing::info!(key, "countdown removed");
        true
    }

    /// Set the current tier of the countdown under `key`.
    pub fn set_countdown_tier(&mut self, key: &str, tier: i32) -> Result<(), ScheduleError> {
        let now = self.clock.now_unix();
        let entry = self
            .timers
            .get_mut(key)
            .ok_or_else(|| ScheduleError::UnknownKey {
                key: key.to_string(),
            })?;

        let tier_count = entry.record.tier_count;
        if !(0..=tier_count).contains(&tier) {
            return Err(ScheduleError::InvalidTier {
                key: key.to_string(),
                tier,
                tier_count,
            });
        }

        entry.record = entry.snapshot(now);
        entry.record.current_tier = tier;
        tracing::debug!(key, tier, "countdown tier changed");
        Ok(())
    }

    // ─── Persistence ─────────────────────────────────────────────────────────

    /// Every tracked countdown as it would be persisted now, in insertion
    /// order.
    pub fn records(&self) -> Vec<CountdownTimerRecord> {
        let now = self.clock.now_unix();
        let mut entries: Vec<_> = self.timers.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.snapshot(now)).collect()
    }

    /// Persist everything and release all timers.
    ///
    /// Returns whether the save succeeded. Dropping an undisposed manager
    /// does the same.
    pub fn dispose(mut self) -> bool {
        self.shutdown()
    }

    fn shutdown(&mut self) -> bool {
        if self.disposed {
            return true;
        }
        self.disposed = true;

        let records = self.records();
        let saved = self.backend.save_timers(&records);
        if saved {
            tracing::info!(count = records.len(), backend = self.backend.kind().label(), "countdowns persisted");
        } else {
            tracing::error!(count = records.len(), "countdowns could not be persisted");
        }

        for (_, entry) in self.timers.drain() {
            entry.timer.dispose();
        }
        saved
    }
}

impl Drop for ScheduleManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for ScheduleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleManager")
            .field("backend", &self.backend.kind())
            .field("timers", &self.keys())
            .field("disposed", &self.disposed)
            .finish()
    }
}

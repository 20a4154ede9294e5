//! Key-value store backend
//!
//! Stores the same JSON document as the file backend under one fixed key,
//! so a deployment can switch backends without migrating data.

use hourglass_types::BackendKind;

use super::backend::TimerBackend;
use super::codec::{decode_timers, encode_timers};
use super::error::PersistenceError;
use super::record::CountdownTimerRecord;
use super::store::KeyValueStore;

/// Store key holding the encoded timer set
pub const TIMERS_STORE_KEY: &str = "hourglass.countdown_timers";

#[derive(Debug, Clone)]
pub struct KeyValueBackend<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueBackend<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn try_save(&mut self, records: &[CountdownTimerRecord]) -> Result<(), PersistenceError> {
        let json = encode_timers(records)?;
        self.store.set_string(TIMERS_STORE_KEY, &json)?;
        self.store.flush()
    }

    fn try_load(&self) -> Result<Vec<CountdownTimerRecord>, PersistenceError> {
        match self.store.get_string(TIMERS_STORE_KEY)? {
            Some(json) => decode_timers(&json),
            None => Ok(Vec::new()),
        }
    }

    fn try_clear(&mut self) -> Result<(), PersistenceError> {
        self.store.delete_key(TIMERS_STORE_KEY)?;
        self.store.flush()
    }
}

impl<S: KeyValueStore> TimerBackend for KeyValueBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::KeyValue
    }

    fn save_timers(&mut self, records: &[CountdownTimerRecord]) -> bool {
        if records.is_empty() {
            return self.clear_timers();
        }

        match self.try_save(records) {
            Ok(()) => {
                tracing::debug!(key = TIMERS_STORE_KEY, count = records.len(), "timers saved");
                true
            }
            Err(e) => {
                tracing::error!(key = TIMERS_STORE_KEY, error = %e, "failed to save timers");
                false
            }
        }
    }

    fn load_timers(&self) -> Vec<CountdownTimerRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key = TIMERS_STORE_KEY, error = %e, "failed to load timers, starting empty");
                Vec::new()
            }
        }
    }

    fn clear_timers(&mut self) -> bool {
        match self.try_clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = TIMERS_STORE_KEY, error = %e, "failed to clear timers");
                false
            }
        }
    }
}

//! Countdown persistence
//!
//! Countdown timers survive restarts by storing absolute unix boundaries
//! instead of relative durations. This module provides:
//! - **Records**: `CountdownTimerRecord` and the JSON envelope shared by all
//!   backends
//! - **TimerBackend**: save/load/clear contract that never fails loudly
//! - **Backends**: a bulk JSON file, or one entry in a flat key-value store
//! - **Factory**: `create_backend` resolves a `BackendKind` from config

mod backend;
mod codec;
mod error;
mod factory;
mod file;
mod key_value;
mod record;
mod store;


pub use backend::TimerBackend;
pub use codec::{PersistedTimerSet, decode_timers, encode_timers};
pub use error::PersistenceError;
pub use factory::{create_backend, default_save_path, default_store_path};
pub use file::FileBackend;
pub use key_value::{KeyValueBackend, TIMERS_STORE_KEY};
pub use record::CountdownTimerRecord;
pub use store::{KeyValueStore, MemoryStore, TomlStore};

pub use hourglass_types::BackendKind;

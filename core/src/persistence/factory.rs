//! Backend selection

use std::path::PathBuf;

use hourglass_types::{BackendKind, ScheduleConfig};

use super::backend::TimerBackend;
use super::file::FileBackend;
use super::key_value::KeyValueBackend;
use super::store::TomlStore;

const APP_DIR: &str = "hourglass";

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// `<data dir>/hourglass/timers.json`
pub fn default_save_path() -> PathBuf {
    data_dir().join("timers.json")
}

/// `<data dir>/hourglass/store.toml`
pub fn default_store_path() -> PathBuf {
    data_dir().join("store.toml")
}

/// Build the backend named by `config.backend`.
pub fn create_backend(config: &ScheduleConfig) -> Box<dyn TimerBackend> {
    match config.backend {
        BackendKind::File => {
            let path = config.save_path.clone().unwrap_or_else(default_save_path);
            tracing::debug!(path = %path.display(), "using file timer backend");
            Box::new(FileBackend::new(path))
        }
        BackendKind::KeyValue => {
            let path = config.store_path.clone().unwrap_or_else(default_store_path);
            tracing::debug!(path = %path.display(), "using key-value timer backend");
            Box::new(KeyValueBackend::new(TomlStore::new(path)))
        }
    }
}

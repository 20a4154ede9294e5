//! Bulk JSON file backend

use std::path::{Path, PathBuf};

use hourglass_types::BackendKind;

use super::backend::TimerBackend;
use super::codec::{decode_timers, encode_timers};
use super::error::PersistenceError;
use super::record::CountdownTimerRecord;

/// Stores the whole timer set as one JSON document at `path`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_save(&self, records: &[CountdownTimerRecord]) -> Result<(), PersistenceError> {
        let json = encode_timers(records)?;
        write_atomic(&self.path, &json)
    }

    fn try_load(&self) -> Result<Vec<CountdownTimerRecord>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        decode_timers(&content)
    }

    fn try_clear(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl TimerBackend for FileBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn save_timers(&mut self, records: &[CountdownTimerRecord]) -> bool {
        if records.is_empty() {
            return self.clear_timers();
        }

        match self.try_save(records) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = records.len(), "timers saved");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to save timers");
                false
            }
        }
    }

    fn load_timers(&self) -> Vec<CountdownTimerRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to load timers, starting empty");
                Vec::new()
            }
        }
    }

    fn clear_timers(&mut self) -> bool {
        match self.try_clear() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to clear timers");
                false
            }
        }
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename,
/// creating parent directories as needed.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    let write_err = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, contents).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        write_err(source)
    })
}

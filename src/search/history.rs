use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::HistoryError;
use crate::models::HistoryEntry;

/// Maximum number of search history entries to keep
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Bounded search journal stored as a JSON array, oldest entry first.
///
/// Appends are serialized within the process; nothing guards against a
/// second process writing the same file.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a finished search, keeping only the newest entries
    pub fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut entries = self.load();
        entries.push(entry);
        if entries.len() > MAX_HISTORY_ENTRIES {
            let excess = entries.len() - MAX_HISTORY_ENTRIES;
            entries.drain(..excess);
        }

        let json = serde_json::to_string_pretty(&entries)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }
        fs::write(&self.path, json).map_err(|source| self.write_error(source))
    }

    /// All entries, most recent first
    pub fn read_recent(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load();
        entries.reverse();
        entries
    }

    /// Remove the journal entirely
    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.write_error(source)),
        }
    }

    /// Missing or unreadable journals count as empty
    fn load(&self) -> Vec<HistoryEntry> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring corrupt history journal {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn write_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

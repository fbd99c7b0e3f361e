//! Session-scoped key-value persistence port.
//!
//! The browser original leaned on per-tab session storage; here the same
//! contract is an injected port so callers choose the backing: an in-memory
//! map (tests, ephemeral sessions) or a JSON file on disk (the CLI). All
//! reads are best-effort — missing or unreadable state degrades to absent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

/// Key-value persistence for session-scoped state.
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when absent.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value (last write wins).
    fn set(&self, key: &str, value: &str);
    /// Remove a value; removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Store persisted as a single JSON object on disk.
///
/// Writes are flushed eagerly on every change. IO and parse failures are
/// logged and otherwise ignored — persistence here is a read cache, not a
/// source of truth.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`. A missing or malformed
    /// file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), error = %e, "cannot create store directory");
                return;
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), error = %e, "cannot persist store");
                }
            }
            Err(e) => warn!(error = %e, "cannot serialize store"),
        }
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.into(), value.into());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

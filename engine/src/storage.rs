//! Key/value persistence for the shell's two keys.
//!
//! | Scope    | Lifetime                              | Backing file                          |
//! |----------|---------------------------------------|---------------------------------------|
//! | durable  | survives restarts                     | `~/.fitsyn/state.json`                |
//! | session  | one terminal session (login shell)    | `<runtime dir>/fitsyn/session-<id>.json` |
//!
//! The session id is `$FITSYN_SESSION` when set, otherwise the parent
//! process id, so relaunching from the same shell counts as the same
//! session while a new terminal starts fresh.
//!
//! Callers never fail on storage errors: they log and fall back to defaults.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fitsyn_utils::{AtomicWriteOptions, FileSyncPolicy, atomic_write_with_options, recover_bak_file};
use thiserror::Error;

pub const SESSION_ENV: &str = "FITSYN_SESSION";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage io error at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("corrupt store at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// FileStore
// ============================================================================

/// JSON object on disk, re-read on every access.
///
/// Re-reading keeps two shell instances in the same session consistent.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.fitsyn/state.json`.
    #[must_use]
    pub fn durable() -> Option<Self> {
        fitsyn_config::data_dir().map(|dir| Self::new(dir.join("state.json")))
    }

    /// Per-terminal-session store under the runtime directory.
    #[must_use]
    pub fn session_scoped() -> Self {
        let base = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(
            base.join("fitsyn")
                .join(format!("session-{}.json", session_id())),
        )
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        recover_bak_file(&self.path);
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.io(err)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let options = AtomicWriteOptions {
            file_sync: FileSyncPolicy::SkipSync,
            ..AtomicWriteOptions::default()
        };
        atomic_write_with_options(&self.path, &bytes, options).map_err(|err| self.io(err))
    }

    /// Current map, or an empty one if the file is unreadable as JSON.
    fn read_map_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_map() {
            Err(StorageError::Corrupt { path, source }) => {
                tracing::warn!(path = %path.display(), "Replacing corrupt store: {source}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn io(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map_for_update()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }
}

fn session_id() -> String {
    if let Ok(id) = std::env::var(SESSION_ENV) {
        let id: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
            .collect();
        if !id.is_empty() {
            return id;
        }
    }
    parent_process_id().to_string()
}

#[cfg(unix)]
fn parent_process_id() -> u32 {
    // SAFETY: getppid has no preconditions and cannot fail.
    let ppid = unsafe { libc::getppid() };
    u32::try_from(ppid).unwrap_or_else(|_| std::process::id())
}

#[cfg(not(unix))]
fn parent_process_id() -> u32 {
    std::process::id()
}

// ============================================================================
// In-memory and unavailable stores
// ============================================================================

/// Shared in-memory store. Clones see the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.map
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A storage medium that refuses every access.
#[derive(Debug, Clone, Default)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn refuse(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(self.refuse())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(self.refuse())
    }
}

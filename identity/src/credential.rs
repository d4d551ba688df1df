//! Persisted refresh credential for the REST backend.
//!
//! This file belongs to the identity backend, not to the shell: it is how a
//! hosted session survives a restart. Written owner-only.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use fitsyn_types::Session;
use fitsyn_utils::{AtomicWriteOptions, PersistMode, atomic_write_with_options, recover_bak_file};
use serde::{Deserialize, Serialize};

const CREDENTIAL_FILE: &str = "identity.json";

#[derive(Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub refresh_token: String,
    pub session: Session,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("refresh_token", &"[REDACTED]")
            .field("session", &self.session)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// `~/.fitsyn/identity.json`, or nothing when there is no home directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self {
            path: fitsyn_config::data_dir().map(|dir| dir.join(CREDENTIAL_FILE)),
        }
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that never persists.
    #[must_use]
    pub fn disabled() -> Self {
        Self { path: None }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn load(&self) -> Option<StoredCredential> {
        let path = self.path.as_deref()?;
        recover_bak_file(path);
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to read credential: {err}");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(credential) => Some(credential),
            Err(err) => {
                tracing::warn!(path = %path.display(), "Discarding corrupt credential: {err}");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, credential: &StoredCredential) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let bytes = match serde_json::to_vec_pretty(credential) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("Failed to encode credential: {err}");
                return;
            }
        };
        let options = AtomicWriteOptions {
            mode: PersistMode::OwnerOnly,
            ..AtomicWriteOptions::default()
        };
        if let Err(err) = atomic_write_with_options(path, &bytes, options) {
            tracing::warn!(path = %path.display(), "Failed to persist credential: {err}");
        }
    }

    pub fn clear(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to remove credential: {err}");
            }
        }
    }
}

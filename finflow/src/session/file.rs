//! JSON-file-backed session store.

use super::{Credentials, SessionStore};
use std::path::PathBuf;
use tracing::warn;

/// A session store persisted as a JSON file.
///
/// Credentials survive process restarts, the way browser local storage
/// survives page reloads. The file is re-read on every `load` so that a
/// concurrent process always observes the latest whole-value write;
/// last-write-wins, consistent with the store's replace-only contract.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store persisting to the given path.
    ///
    /// The file does not need to exist yet; a missing or unreadable file
    /// loads as an empty credential set.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path credentials are persisted to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Credentials {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(path = %self.path.display(), %err, "session file unreadable, treating as logged out");
                Credentials::default()
            }),
            Err(_) => Credentials::default(),
        }
    }

    fn store(&self, credentials: Credentials) {
        let json = match serde_json::to_vec_pretty(&credentials) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "failed to encode credentials");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            warn!(path = %self.path.display(), %err, "failed to persist credentials");
        }
    }
}

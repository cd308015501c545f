//! In-memory session store.

use super::{Credentials, SessionStore};
use parking_lot::RwLock;

/// A process-local session store backed by an `RwLock`.
///
/// Suitable for tests and short-lived tools where credentials do not need to
/// outlive the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    credentials: RwLock<Credentials>,
}

impl MemorySessionStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given credentials.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Credentials {
        self.credentials.read().clone()
    }

    fn store(&self, credentials: Credentials) {
        *self.credentials.write() = credentials;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_store_and_load() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_empty());

        store.store(Credentials::authenticated("A1", "R1", "a@b.com"));
        assert_eq!(store.load().access_token.as_deref(), Some("A1"));
    }

    #[test]
    fn test_with_credentials() {
        let store =
            MemorySessionStore::with_credentials(Credentials::authenticated("A1", "R1", "a@b.com"));
        assert_eq!(store.load().email.as_deref(), Some("a@b.com"));
    }
}

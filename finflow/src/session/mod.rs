//! Session state: the credential set and its stores.
//!
//! The credential set has exactly three writers: the login flow (whole-value
//! write), the pipeline (access-token replace on refresh success, clear on
//! refresh failure), and the logout flow (clear). Stores provide
//! whole-value-replace semantics only; there is no field-level transaction.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};

/// The credential set shared by the login flow and the request pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Short-lived access token, replaced in place on refresh.
    pub access_token: Option<String>,
    /// Longer-lived token used only against the refresh endpoint.
    pub refresh_token: Option<String>,
    /// Email of the logged-in user.
    pub email: Option<String>,
}

impl Credentials {
    /// Creates a fully-populated credential set, as written on login success.
    #[must_use]
    pub fn authenticated(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            email: Some(email.into()),
        }
    }

    /// Whether no credential field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.email.is_none()
    }
}

/// Storage for the credential set.
///
/// Implementations replace the whole value on every write. The pipeline
/// takes the store as an injected dependency so tests can substitute an
/// in-memory store and assert on its contents.
pub trait SessionStore: Send + Sync {
    /// Reads the current credential set.
    fn load(&self) -> Credentials;

    /// Replaces the entire credential set.
    fn store(&self, credentials: Credentials);

    /// Replaces only the access token, keeping the other fields.
    ///
    /// This is the refresh-success write path.
    fn set_access_token(&self, access_token: String) {
        let mut credentials = self.load();
        credentials.access_token = Some(access_token);
        self.store(credentials);
    }

    /// Clears all credential fields together.
    fn clear(&self) {
        self.store(Credentials::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_credentials_authenticated() {
        let creds = Credentials::authenticated("A1", "R1", "a@b.com");
        assert_eq!(creds.access_token.as_deref(), Some("A1"));
        assert_eq!(creds.refresh_token.as_deref(), Some("R1"));
        assert_eq!(creds.email.as_deref(), Some("a@b.com"));
        assert!(!creds.is_empty());
    }

    #[test]
    fn test_credentials_default_is_empty() {
        assert!(Credentials::default().is_empty());
    }

    #[test]
    fn test_set_access_token_keeps_other_fields() {
        let store = MemorySessionStore::new();
        store.store(Credentials::authenticated("A1", "R1", "a@b.com"));

        store.set_access_token("A2".to_string());

        let creds = store.load();
        assert_eq!(creds.access_token.as_deref(), Some("A2"));
        assert_eq!(creds.refresh_token.as_deref(), Some("R1"));
        assert_eq!(creds.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_clear_removes_all_fields() {
        let store = MemorySessionStore::new();
        store.store(Credentials::authenticated("A1", "R1", "a@b.com"));

        store.clear();

        assert!(store.load().is_empty());
    }
}

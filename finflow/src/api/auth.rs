//! Account authentication endpoints.

use crate::errors::ClientError;
use crate::models::{RegisterResponse, TokenPair};
use crate::pipeline::{ApiClient, RequestDescriptor};
use crate::session::Credentials;
use reqwest::Method;
use tracing::debug;

impl ApiClient {
    /// Exchanges email and password for a token pair.
    ///
    /// On success the full credential set (access token, refresh token,
    /// email) is written to the session store in one whole-value replace,
    /// and subsequent [`execute`](ApiClient::execute) calls authenticate
    /// with it.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` on invalid credentials; `Api`, `Network` or
    /// `Timeout` otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ClientError> {
        let descriptor = RequestDescriptor::json(
            Method::POST,
            "/login",
            serde_json::json!({ "email": email, "password": password }),
        );
        let response = self.send_unauthenticated(&descriptor).await?;
        let tokens: TokenPair = response.json()?;

        self.session().store(Credentials::authenticated(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            email,
        ));
        debug!(email, "logged in");
        Ok(tokens)
    }

    /// Creates an account from email and password.
    ///
    /// Writes nothing to the session store; the caller keeps the returned
    /// confirmation as local state (for example to show a login shortcut
    /// after a successful registration).
    ///
    /// # Errors
    ///
    /// `Api` with the server's validation message (invalid email, short
    /// password, duplicate account), `Network` or `Timeout`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let descriptor = RequestDescriptor::json(
            Method::POST,
            "/register",
            serde_json::json!({ "email": email, "password": password }),
        );
        let response = self.send_unauthenticated(&descriptor).await?;
        Ok(response.json()?)
    }

    /// Clears the credential set. No network call is made.
    pub fn logout(&self) {
        debug!("logging out");
        self.session().clear();
    }
}

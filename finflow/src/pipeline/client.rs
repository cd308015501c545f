//! The API client and its refresh-and-retry logic.

use super::RequestDescriptor;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::RefreshResponse;
use crate::session::SessionStore;
use crate::transport::{
    HttpTransport, RequestBody, Transport, TransportError, TransportRequest, TransportResponse,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Client for the expense-tracker API.
///
/// Holds the configured base URL, a transport, and the injected session
/// store. The client is cheap to share behind an `Arc` and safe to call
/// from concurrent tasks; concurrent 401 episodes share a single refresh
/// through an internal gate.
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    /// Serializes refresh attempts so one 401 episode produces one refresh.
    refresh_gate: tokio::sync::Mutex<()>,
    on_session_expired: parking_lot::Mutex<Option<SessionExpiredHook>>,
}

impl ApiClient {
    /// Creates a client over a real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.user_agent)
            .map_err(|err| ClientError::network(err.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport), session))
    }

    /// Creates a client over an injected transport.
    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
            refresh_gate: tokio::sync::Mutex::new(()),
            on_session_expired: parking_lot::Mutex::new(None),
        }
    }

    /// The injected session store.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Registers a hook invoked when a refresh failure clears the session.
    ///
    /// The embedding application uses this to navigate back to its login
    /// entry point. Invoked at most once per refresh-failure episode.
    pub fn on_session_expired(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_session_expired.lock() = Some(Arc::new(hook));
    }

    /// Issues one logical authenticated request.
    ///
    /// Ordered behavior: send with the current access token; on any non-401
    /// outcome resolve or surface it unmodified; on a 401 run exactly one
    /// refresh cycle and re-send the original request once with the new
    /// token. A missing access token is not a short-circuit: the request is
    /// still attempted and the server's 401 drives the same refresh path.
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<TransportResponse, ClientError> {
        let request_id = Uuid::new_v4();
        let stale = self.session.load().access_token;

        let response = self
            .attempt(descriptor, stale.clone(), request_id, "request")
            .await?;
        if !response.is_unauthorized() {
            return Self::settle(response);
        }

        debug!(%request_id, path = %descriptor.path, "401 received, starting refresh cycle");
        let fresh = self.fresh_access_token(stale.as_deref(), request_id).await?;

        let retry = self
            .attempt(descriptor, Some(fresh), request_id, "retry")
            .await?;
        if retry.is_unauthorized() {
            // At most one retry per call: a second 401 is surfaced as-is,
            // like any other non-2xx retry outcome.
            warn!(%request_id, path = %descriptor.path, "retry rejected after refresh");
        }
        Self::settle(retry)
    }

    /// Executes a request and decodes the 2xx body as JSON.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, ClientError> {
        let response = self.execute(descriptor).await?;
        Ok(response.json()?)
    }

    /// Sends a request without a bearer token and without refresh recovery.
    ///
    /// Used by the login and register endpoints, which are the only calls
    /// made outside an authenticated session.
    pub(crate) async fn send_unauthenticated(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<TransportResponse, ClientError> {
        let response = self
            .attempt(descriptor, None, Uuid::new_v4(), "request")
            .await?;
        if response.is_unauthorized() {
            return Err(ClientError::unauthenticated(response.error_message()));
        }
        Self::settle(response)
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn attempt(
        &self,
        descriptor: &RequestDescriptor,
        bearer: Option<String>,
        request_id: Uuid,
        phase: &str,
    ) -> Result<TransportResponse, ClientError> {
        let request = TransportRequest {
            method: descriptor.method.clone(),
            url: self.config.join(&descriptor.path),
            bearer,
            body: descriptor.body.clone(),
            request_id,
        };
        self.transport
            .send(request, self.config.timeout())
            .await
            .map_err(|err| match err {
                TransportError::Timeout => ClientError::timeout(phase),
                TransportError::Connect(message) => ClientError::network(message),
            })
    }

    /// Resolves a 401 episode to a usable access token, refreshing at most
    /// once across all concurrent callers.
    ///
    /// The first caller through the gate sends the refresh; callers that
    /// were waiting find the store already updated (or already cleared) and
    /// share that outcome instead of refreshing again.
    async fn fresh_access_token(
        &self,
        stale: Option<&str>,
        request_id: Uuid,
    ) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.load();
        if let Some(token) = &current.access_token {
            if stale != Some(token.as_str()) {
                debug!(%request_id, "reusing access token refreshed by a concurrent request");
                return Ok(token.clone());
            }
        }
        if stale.is_some() && current.is_empty() {
            return Err(ClientError::refresh_failed(
                "session cleared by a concurrent refresh failure",
            ));
        }

        let request = TransportRequest {
            method: Method::POST,
            url: self.config.join("/refresh"),
            bearer: current.refresh_token,
            body: RequestBody::Json(serde_json::json!({})),
            request_id,
        };
        let outcome = self
            .transport
            .send(request, self.config.refresh_timeout())
            .await;

        match outcome {
            Ok(response) if response.is_success() => match response.json::<RefreshResponse>() {
                Ok(refresh) => {
                    self.session.set_access_token(refresh.access_token.clone());
                    debug!(%request_id, "access token refreshed");
                    Ok(refresh.access_token)
                }
                Err(err) => Err(self.expire_session(format!("refresh response unreadable: {err}"))),
            },
            Ok(response) => Err(self.expire_session(format!(
                "refresh rejected with status {}",
                response.status
            ))),
            Err(err) => Err(self.expire_session(format!("refresh unreachable: {err}"))),
        }
    }

    /// Clears the credential set and signals the embedder to re-authenticate.
    fn expire_session(&self, message: String) -> ClientError {
        warn!(%message, "clearing credentials, re-authentication required");
        self.session.clear();
        // The hook slot lock is released before the hook runs, so a hook
        // may itself call `on_session_expired` without deadlocking.
        let hook = self.on_session_expired.lock().clone();
        if let Some(hook) = hook {
            hook();
        }
        ClientError::refresh_failed(message)
    }

    fn settle(response: TransportResponse) -> Result<TransportResponse, ClientError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::api(response.status, response.error_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::session::{Credentials, MemorySessionStore};
    use crate::testing::{error_json, refresh_json, user_files_json, ScriptedTransport};
    use crate::transport::MultipartField;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn client_with(
        transport: Arc<ScriptedTransport>,
        credentials: Credentials,
    ) -> (ApiClient, Arc<MemorySessionStore>) {
        let session = Arc::new(MemorySessionStore::with_credentials(credentials));
        let client = ApiClient::with_transport(
            ClientConfig::new("http://api.test"),
            transport,
            session.clone(),
        );
        (client, session)
    }

    fn logged_in() -> Credentials {
        Credentials::authenticated("A1", "R1", "a@b.com")
    }

    #[tokio::test]
    async fn test_success_issues_exactly_one_call() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, &user_files_json());
        let (client, _) = client_with(transport.clone(), logged_in());

        let response = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.request_count(), 1);
        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/user-files");
        assert_eq!(request.bearer.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn test_non_auth_error_propagates_server_message() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(404, &serde_json::json!({"detail": "User file not found"}));
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files/99"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 404, .. }));
        assert_eq!(err.to_string(), "api error (status 404): User file not found");
        assert_eq!(err.kind(), FailureKind::NetworkOrServer);
        assert_eq!(transport.request_count(), 1);
        // Non-auth failures never touch the credential set.
        assert_eq!(session.load(), logged_in());
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_and_retries_once() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(200, &refresh_json("A2"));
        transport.push_json(200, &user_files_json());
        let (client, session) = client_with(transport.clone(), logged_in());

        let response = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        // original -> refresh -> retry, strictly in order
        assert_eq!(requests[0].url, "http://api.test/user-files");
        assert_eq!(requests[0].bearer.as_deref(), Some("A1"));
        assert_eq!(requests[1].url, "http://api.test/refresh");
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].bearer.as_deref(), Some("R1"));
        assert_eq!(requests[2].url, "http://api.test/user-files");
        assert_eq!(requests[2].bearer.as_deref(), Some("A2"));
        // all three attempts belong to the same logical request
        assert_eq!(requests[0].request_id, requests[1].request_id);
        assert_eq!(requests[1].request_id, requests[2].request_id);

        let credentials = session.load();
        assert_eq!(credentials.access_token.as_deref(), Some("A2"));
        assert_eq!(credentials.refresh_token.as_deref(), Some("R1"));
        assert_eq!(credentials.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_refresh_rejection_clears_session_and_skips_retry() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(401, &error_json("Invalid refresh token"));
        let (client, session) = client_with(transport.clone(), logged_in());

        let expired = Arc::new(AtomicUsize::new(0));
        let counter = expired.clone();
        client.on_session_expired(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        assert_eq!(err.kind(), FailureKind::RefreshFailed);
        // original + refresh only; the retry is never sent
        assert_eq!(transport.request_count(), 2);
        assert!(session.load().is_empty());
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_hook_may_reregister_itself() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(401, &error_json("Invalid refresh token"));
        let session = Arc::new(MemorySessionStore::with_credentials(logged_in()));
        let client = Arc::new(ApiClient::with_transport(
            ClientConfig::new("http://api.test"),
            transport,
            session,
        ));

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let reentrant = client.clone();
        client.on_session_expired(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // Swapping the hook from inside the hook must not deadlock.
            let replacement = counter.clone();
            reentrant.on_session_expired(move || {
                replacement.fetch_add(1, Ordering::SeqCst);
            });
        });

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_server_error_clears_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(500, &error_json("internal error"));
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        assert!(session.load().is_empty());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_transport_failure_clears_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_error(TransportError::Timeout);
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        assert!(session.load().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_with_unreadable_body_clears_session() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(200, &serde_json::json!({"unexpected": true}));
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        assert!(session.load().is_empty());
    }

    #[tokio::test]
    async fn test_second_401_is_surfaced_not_retried() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(200, &refresh_json("A2"));
        transport.push_json(401, &error_json("still unauthorized"));
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        // The retry outcome is returned as-is: an Api error carrying the
        // 401, which still classifies as an auth failure for the caller.
        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert_eq!(err.kind(), FailureKind::Unauthenticated);
        assert_eq!(transport.request_count(), 3);
        // The refresh itself succeeded, so the session is kept.
        assert_eq!(session.load().access_token.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn test_missing_token_still_attempts_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Missing Authorization Header"));
        transport.push_json(401, &error_json("Missing Authorization Header"));
        let (client, _) = client_with(transport.clone(), Credentials::default());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        // No short-circuit: the request and the refresh are both attempted
        // without a bearer, and the refresh rejection is terminal.
        assert!(matches!(err, ClientError::RefreshFailed { .. }));
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer, None);
    }

    #[tokio::test]
    async fn test_repeated_execute_is_independent() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, &user_files_json());
        transport.push_json(200, &user_files_json());
        let (client, session) = client_with(transport.clone(), logged_in());

        let descriptor = RequestDescriptor::get("/user-files");
        client.execute(&descriptor).await.unwrap();
        client.execute(&descriptor).await.unwrap();

        assert_eq!(transport.request_count(), 2);
        assert_eq!(session.load(), logged_in());
    }

    #[tokio::test]
    async fn test_original_request_timeout_surfaces_phase() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_error(TransportError::Timeout);
        let (client, session) = client_with(transport.clone(), logged_in());

        let err = client
            .execute(&RequestDescriptor::get("/user-files"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout { .. }));
        assert_eq!(err.kind(), FailureKind::NetworkOrServer);
        // Timeouts are not auth failures and keep the session intact.
        assert_eq!(session.load(), logged_in());
    }

    #[tokio::test]
    async fn test_multipart_retry_rebuilds_form() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(401, &error_json("Token has expired"));
        transport.push_json(200, &refresh_json("A2"));
        transport.push_json(200, &serde_json::json!({"file_id": 9}));
        let (client, _) = client_with(transport.clone(), logged_in());

        let descriptor = RequestDescriptor::multipart(
            Method::POST,
            "/upload-user-file",
            vec![
                MultipartField::File {
                    name: "file".to_string(),
                    filename: "statement.csv".to_string(),
                    bytes: b"date,amount".to_vec(),
                },
                MultipartField::Text {
                    name: "bank_file_format_id".to_string(),
                    value: "1".to_string(),
                },
            ],
        );
        client.execute(&descriptor).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        // original and retry both carry the full multipart form
        assert!(requests[0].body.is_multipart());
        assert!(requests[2].body.is_multipart());
        assert_eq!(requests[2].bearer.as_deref(), Some("A2"));
        // the refresh carries a JSON body, never the form
        assert!(!requests[1].body.is_multipart());
    }

    /// Transport that forces two callers to observe a 401 concurrently, then
    /// counts how many refresh calls they produce between them.
    struct ContendedTransport {
        barrier: tokio::sync::Barrier,
        refresh_calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Transport for ContendedTransport {
        async fn send(
            &self,
            request: TransportRequest,
            _timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            if request.url.ends_with("/refresh") {
                self.refresh_calls.fetch_add(1, Ordering::SeqCst);
                let body = serde_json::to_vec(&refresh_json("A2")).unwrap();
                return Ok(TransportResponse::new(200, body));
            }
            match request.bearer.as_deref() {
                Some("A2") => Ok(TransportResponse::new(200, b"[]".to_vec())),
                _ => {
                    // Hold both initial attempts here so neither refresh can
                    // finish before the other caller has seen its 401.
                    self.barrier.wait().await;
                    let body = serde_json::to_vec(&error_json("Token has expired")).unwrap();
                    Ok(TransportResponse::new(401, body))
                }
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let transport = Arc::new(ContendedTransport {
            barrier: tokio::sync::Barrier::new(2),
            refresh_calls: AtomicUsize::new(0),
        });
        let session = Arc::new(MemorySessionStore::with_credentials(logged_in()));
        let client = Arc::new(ApiClient::with_transport(
            ClientConfig::new("http://api.test"),
            transport.clone(),
            session.clone(),
        ));

        let descriptor = RequestDescriptor::get("/user-files");
        let (first, second) =
            tokio::join!(client.execute(&descriptor), client.execute(&descriptor));

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(transport.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.load().access_token.as_deref(), Some("A2"));
    }
}

//! HTTP transport seam.
//!
//! The pipeline talks to the network through the [`Transport`] trait so tests
//! can substitute a scripted implementation and assert on exactly which
//! requests were issued, in which order, with which bearer tokens.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// One HTTP request as the pipeline hands it to a transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully-resolved URL.
    pub url: String,
    /// Bearer token for the `Authorization` header, when present.
    pub bearer: Option<String>,
    /// Request body.
    pub body: RequestBody,
    /// Correlates the attempts of one logical request in logs.
    pub request_id: Uuid,
}

/// Request body variants.
///
/// Multipart parts are owned values rather than a built form, so the
/// pipeline can rebuild an identical form for the post-refresh retry.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No body (GET, DELETE).
    Empty,
    /// JSON body; the transport sets `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Multipart form body; the transport must NOT set an explicit content
    /// type, leaving the boundary to the underlying HTTP library.
    Multipart(Vec<MultipartField>),
}

impl RequestBody {
    /// Whether this is a multipart body.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub enum MultipartField {
    /// A plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file attachment.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        filename: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

/// A raw HTTP response as returned by a transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Whether the response is a 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the response is a 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Extracts the server's error message from the body.
    ///
    /// The backend emits `{"message": ...}` (Flask) or `{"detail": ...}`
    /// (FastAPI); some JWT middlewares use `"msg"`. Falls back to the raw
    /// body text, then to a generic message.
    #[must_use]
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for key in ["message", "detail", "msg"] {
                if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                    return text.to_string();
                }
            }
        }
        let text = String::from_utf8_lossy(&self.body);
        let text = text.trim();
        if text.is_empty() {
            format!("request failed with status {}", self.status)
        } else {
            text.to_string()
        }
    }
}

/// Errors a transport can produce (anything without an HTTP status).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,
    /// The request could not be delivered.
    #[error("connection failed: {0}")]
    Connect(String),
}

/// Sends one HTTP request and returns its raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request, failing if no response arrives within `timeout`.
    async fn send(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

//! Request descriptors.

use crate::transport::{MultipartField, RequestBody};
use reqwest::Method;

/// One logical API request, immutable once constructed.
///
/// The pipeline never retains a descriptor beyond a single `execute` call;
/// it re-reads the same descriptor to rebuild the request for the
/// post-refresh retry.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Relative API path, resolved against the configured base URL.
    pub path: String,
    /// Request body.
    pub body: RequestBody,
}

impl RequestDescriptor {
    /// Creates a GET request descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a DELETE request descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a descriptor with a JSON body.
    #[must_use]
    pub fn json(method: Method, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Json(body),
        }
    }

    /// Creates a descriptor with a multipart form body.
    #[must_use]
    pub fn multipart(method: Method, path: impl Into<String>, fields: Vec<MultipartField>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Multipart(fields),
        }
    }

    /// Whether the body is a multipart form.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.body.is_multipart()
    }
}

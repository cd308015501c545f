//! reqwest-backed transport.

use super::{MultipartField, RequestBody, Transport, TransportError, TransportRequest, TransportResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// The production [`Transport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given user agent.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the TLS backend cannot be
    /// initialized.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds the concrete HTTP request for one attempt.
    ///
    /// Header contract: the bearer token goes on `Authorization`;
    /// non-multipart requests always declare `Content-Type:
    /// application/json`, body or not; multipart requests get no explicit
    /// content type here, leaving reqwest to supply the form boundary.
    fn build_request(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(timeout);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => {
                builder.header(reqwest::header::CONTENT_TYPE, "application/json")
            }
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(ref fields) => builder.multipart(Self::build_form(fields)),
        };

        builder.build()
    }

    fn build_form(fields: &[MultipartField]) -> Form {
        let mut form = Form::new();
        for field in fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartField::File {
                    name,
                    filename,
                    bytes,
                } => form.part(
                    name.clone(),
                    Part::bytes(bytes.clone()).file_name(filename.clone()),
                ),
            };
        }
        form
    }

    fn map_error(err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Connect(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: TransportRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        debug!(
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            "dispatching request"
        );

        let http_request = self
            .build_request(request, timeout)
            .map_err(|e| Self::map_error(&e))?;
        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| Self::map_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e))?
            .to_vec();

        Ok(TransportResponse::new(status, body))
    }
}

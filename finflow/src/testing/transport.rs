//! Scripted transport fake.

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// A [`Transport`] that replays a pre-programmed script of responses and
/// records every request it receives.
///
/// Responses are consumed in FIFO order. A request arriving after the script
/// is exhausted panics, which turns an unexpected extra network call into an
/// immediate test failure.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response with the given status.
    pub fn push_json(&self, status: u16, body: &serde_json::Value) {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        self.push_response(TransportResponse::new(status, bytes));
    }

    /// Queues a raw response.
    pub fn push_response(&self, response: TransportResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Returns copies of all requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clears recorded requests, keeping the remaining script.
    pub fn reset_recording(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: TransportRequest,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let next = self.script.lock().pop_front();
        self.requests.lock().push(request.clone());
        match next {
            Some(outcome) => outcome,
            None => panic!(
                "unscripted request: {} {} (script exhausted after {} calls)",
                request.method,
                request.url,
                self.requests.lock().len() - 1
            ),
        }
    }
}

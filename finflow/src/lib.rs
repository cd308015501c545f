//! # Finflow
//!
//! Rust client for the finflow expense-tracker API.
//!
//! The crate wraps every outbound call in an authenticated request pipeline
//! with:
//!
//! - **Bearer authentication**: the current access token from an injected
//!   session store goes on every request
//! - **Transparent refresh**: a 401 triggers exactly one refresh cycle and
//!   one retry of the original request with the new token
//! - **Forced logout**: an unrecoverable refresh failure clears the
//!   credential set before the error reaches the caller
//! - **Single-flight refresh**: concurrent 401 episodes share one refresh
//!   instead of racing their own
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use finflow::prelude::*;
//! use std::sync::Arc;
//!
//! let session = Arc::new(FileSessionStore::new("session.json"));
//! let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:5000"), session)?;
//!
//! client.login("a@b.com", "password").await?;
//! let files = client.user_files().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod testing;
pub mod transport;

pub use config::ClientConfig;
pub use errors::{ClientError, FailureKind};
pub use pipeline::{ApiClient, RequestDescriptor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::errors::{ClientError, FailureKind};
    pub use crate::models::{
        BankFileFormat, ParsedReceipt, RefreshResponse, RegisterResponse, TokenPair, Transaction,
        UploadResponse, UserFileDetail, UserFileSummary,
    };
    pub use crate::pipeline::{ApiClient, RequestDescriptor};
    pub use crate::session::{Credentials, FileSessionStore, MemorySessionStore, SessionStore};
    pub use crate::transport::{
        HttpTransport, MultipartField, RequestBody, Transport, TransportError, TransportRequest,
        TransportResponse,
    };
}

//! The authenticated request pipeline.
//!
//! [`ApiClient::execute`] issues one logical request with the current access
//! token and recovers from exactly one class of failure (an expired token)
//! by refreshing and retrying once. An unrecoverable refresh failure always
//! clears the credential set before the error reaches the caller, so callers
//! never own token or retry logic.

mod client;
mod descriptor;

pub use client::ApiClient;
pub use descriptor::RequestDescriptor;

//! Test doubles and fixtures.
//!
//! [`ScriptedTransport`] replaces the HTTP layer with a queue of canned
//! responses while recording every request it receives, so tests can assert
//! on call counts, ordering, and bearer tokens without a network.

mod fixtures;
mod transport;

pub use fixtures::{
    bank_formats_json, error_json, receipt_json, refresh_json, token_pair_json, user_files_json,
};
pub use transport::ScriptedTransport;

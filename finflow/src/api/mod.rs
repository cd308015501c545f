//! Typed endpoint wrappers.
//!
//! Thin methods on [`crate::ApiClient`], grouped by concern: account
//! authentication, statement files, and receipt parsing. Every method
//! delegates to the pipeline (or, for login and register, to the bare
//! unauthenticated send) so none of them carries retry or token logic.

mod auth;
mod files;
mod receipts;

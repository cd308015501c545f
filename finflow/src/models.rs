//! Wire types for the expense-tracker API.
//!
//! Field names and shapes mirror the server's JSON exactly; timestamps come
//! back as naive ISO-8601 strings (the server stores UTC without an offset).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Access and refresh tokens returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential authorizing API calls.
    pub access_token: String,
    /// Longer-lived credential used solely to obtain new access tokens.
    pub refresh_token: String,
}

/// Response from the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The replacement access token.
    pub access_token: String,
}

/// Response from the register endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Human-readable confirmation message.
    pub message: String,
}

/// A bank statement format the server knows how to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankFileFormat {
    /// Format identifier, referenced when uploading a statement.
    pub id: i64,
    /// Display name, e.g. `"Standard Chartered CSV"`.
    pub name: String,
}

/// Response from a statement upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the newly stored file.
    pub file_id: i64,
}

/// Summary row for an uploaded statement file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFileSummary {
    /// File identifier.
    pub id: i64,
    /// Name of the bank file format the statement was parsed with.
    pub file_format: String,
    /// When the file was uploaded.
    pub created_on: NaiveDateTime,
    /// Number of transactions extracted from the file.
    pub no_of_transactions: u32,
}

/// A single parsed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: i64,
    /// When the transaction occurred.
    pub transaction_date: NaiveDateTime,
    /// Transaction amount.
    pub amount: f64,
    /// Primary remarks column from the statement.
    pub remarks_1: Option<String>,
    /// Secondary remarks column; populated for some formats only.
    #[serde(default)]
    pub remarks_2: Option<String>,
}

/// Detail view of an uploaded statement file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFileDetail {
    /// Name of the bank file format the statement was parsed with.
    pub file_format: String,
    /// When the file was uploaded.
    pub created_on: NaiveDateTime,
    /// Transactions extracted from the file.
    pub transactions: Vec<Transaction>,
}

/// Fields extracted from a receipt image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Identifier of the stored receipt.
    pub receipt_id: String,
    /// Purchase date printed on the receipt.
    pub date: NaiveDate,
    /// Total amount printed on the receipt.
    pub amount: f64,
    /// Currency code, e.g. `"USD"`.
    pub currency: String,
}

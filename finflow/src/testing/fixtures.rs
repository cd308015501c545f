//! Canned JSON payloads matching the server's wire shapes.

use serde_json::{json, Value};

/// A login response body.
#[must_use]
pub fn token_pair_json(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    })
}

/// A refresh response body.
#[must_use]
pub fn refresh_json(access_token: &str) -> Value {
    json!({ "access_token": access_token })
}

/// An error payload in the backend's `{"message": ...}` shape.
#[must_use]
pub fn error_json(message: &str) -> Value {
    json!({ "message": message })
}

/// The bank file format listing.
#[must_use]
pub fn bank_formats_json() -> Value {
    json!([
        { "id": 1, "name": "Standard Chartered CSV" },
        { "id": 2, "name": "Standard Chartered XLSX" },
    ])
}

/// A two-row user file listing.
#[must_use]
pub fn user_files_json() -> Value {
    json!([
        {
            "id": 3,
            "file_format": "Standard Chartered CSV",
            "created_on": "2024-03-15T09:30:00",
            "no_of_transactions": 42
        },
        {
            "id": 4,
            "file_format": "Standard Chartered XLSX",
            "created_on": "2024-04-02T18:05:11",
            "no_of_transactions": 7
        },
    ])
}

/// A parsed receipt body.
#[must_use]
pub fn receipt_json() -> Value {
    json!({
        "receipt_id": "RC1",
        "date": "2024-01-01",
        "amount": 12.5,
        "currency": "USD"
    })
}

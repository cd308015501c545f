//! Receipt parsing endpoint.

use crate::errors::ClientError;
use crate::models::ParsedReceipt;
use crate::pipeline::{ApiClient, RequestDescriptor};
use crate::transport::MultipartField;
use reqwest::Method;

impl ApiClient {
    /// Uploads a receipt image and returns the fields extracted from it.
    pub async fn parse_receipt(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<ParsedReceipt, ClientError> {
        let descriptor = RequestDescriptor::multipart(
            Method::POST,
            "/parse-receipt",
            vec![MultipartField::File {
                name: "receipt".to_string(),
                filename: filename.to_string(),
                bytes,
            }],
        );
        self.execute_json(&descriptor).await
    }
}

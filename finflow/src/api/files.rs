//! Statement file endpoints.

use crate::errors::ClientError;
use crate::models::{BankFileFormat, UploadResponse, UserFileDetail, UserFileSummary};
use crate::pipeline::{ApiClient, RequestDescriptor};
use crate::transport::MultipartField;
use reqwest::Method;

impl ApiClient {
    /// Lists the bank statement formats the server can parse.
    pub async fn bank_file_formats(&self) -> Result<Vec<BankFileFormat>, ClientError> {
        self.execute_json(&RequestDescriptor::get("/bank-file-formats"))
            .await
    }

    /// Uploads a bank statement for parsing.
    ///
    /// Sends a multipart form with the file contents and the chosen
    /// `bank_file_format_id`; the transport leaves the content type to the
    /// HTTP library so the multipart boundary is set correctly.
    pub async fn upload_user_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        bank_file_format_id: i64,
    ) -> Result<UploadResponse, ClientError> {
        let descriptor = RequestDescriptor::multipart(
            Method::POST,
            "/upload-user-file",
            vec![
                MultipartField::File {
                    name: "file".to_string(),
                    filename: filename.to_string(),
                    bytes,
                },
                MultipartField::Text {
                    name: "bank_file_format_id".to_string(),
                    value: bank_file_format_id.to_string(),
                },
            ],
        );
        self.execute_json(&descriptor).await
    }

    /// Lists the user's uploaded statement files.
    pub async fn user_files(&self) -> Result<Vec<UserFileSummary>, ClientError> {
        self.execute_json(&RequestDescriptor::get("/user-files"))
            .await
    }

    /// Fetches one statement file with its parsed transactions.
    pub async fn user_file(&self, id: i64) -> Result<UserFileDetail, ClientError> {
        self.execute_json(&RequestDescriptor::get(format!("/user-files/{id}")))
            .await
    }

    /// Deletes a statement file and its transactions.
    ///
    /// Destructive; callers are expected to have confirmed the action with
    /// the user before issuing it.
    pub async fn delete_user_file(&self, id: i64) -> Result<(), ClientError> {
        self.execute(&RequestDescriptor::delete(format!("/user-files/{id}")))
            .await?;
        Ok(())
    }
}

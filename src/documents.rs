//! File upload, document and download operations.
//!
//! Uploads are two-step: a file is first posted as multipart form data to
//! `/files`, then attached to an envelope by reference.

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::client::{ApiResult, Client, RequestBody, with_query};
use crate::error::{ESignError, Result};
use crate::types::{
    AddDocumentRequest, Document, DownloadOptions, DownloadOutput, DownloadUrl, File, Listing,
    file_reference,
};

/// Multipart field carrying the file bytes.
const UPLOAD_FIELD: &str = "file";

/// Client for document operations.
///
/// Access via `client.documents()`.
pub struct DocumentsClient {
    client: Client,
}

impl DocumentsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Upload a local file.
    ///
    /// Read failures are reported as [`ESignError::Filesystem`] before any
    /// request is made.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, Credentials};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
    ///     let file = client.documents().upload_file("contract.pdf").await?;
    ///     println!("Uploaded as {}", file.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<File> {
        self.upload_file_raw(path).await?.into_json()
    }

    /// Upload a local file and return the service response as-is.
    pub async fn upload_file_raw(&self, path: impl AsRef<Path>) -> Result<ApiResult> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ESignError::Filesystem {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        self.upload_bytes_raw(file_name, bytes).await
    }

    /// Upload in-memory bytes under the given file name.
    pub async fn upload_bytes(&self, file_name: impl Into<String>, bytes: Vec<u8>) -> Result<File> {
        self.upload_bytes_raw(file_name, bytes).await?.into_json()
    }

    pub async fn upload_bytes_raw(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<ApiResult> {
        let file_name = file_name.into();
        debug!(file_name = %file_name, size = bytes.len(), "uploading file");
        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(bytes).file_name(file_name));

        self.client
            .execute(Method::POST, "/files", Some(RequestBody::Multipart(form)))
            .await
    }

    /// Attach an uploaded file to an envelope.
    pub async fn add(&self, envelope_id: &Uuid, request: AddDocumentRequest) -> Result<Document> {
        self.add_raw(envelope_id, request).await?.into_json()
    }

    pub async fn add_raw(&self, envelope_id: &Uuid, request: AddDocumentRequest) -> Result<ApiResult> {
        let body = json!({
            "file": file_reference(&request.file_id),
            "name": request.name,
        });
        self.client
            .send(
                Method::POST,
                &format!("/envelopes/{}/documents", envelope_id),
                &body,
            )
            .await
    }

    /// List the documents of an envelope.
    ///
    /// Accepts both a bare array and a wrapped `{"items": [...]}` response.
    pub async fn list(&self, envelope_id: &Uuid) -> Result<Vec<Document>> {
        let listing: Listing<Document> = self.list_raw(envelope_id).await?.into_json()?;
        Ok(listing.into_items())
    }

    pub async fn list_raw(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .get(&format!("/envelopes/{}/documents", envelope_id))
            .await
    }

    /// Get a time-limited download link.
    ///
    /// The link expires after a few minutes; that expiry is tracked by the
    /// service, not by this client.
    pub async fn download_url(
        &self,
        envelope_id: &Uuid,
        output: Option<DownloadOutput>,
    ) -> Result<DownloadUrl> {
        self.download_url_raw(envelope_id, output).await?.into_json()
    }

    pub async fn download_url_raw(
        &self,
        envelope_id: &Uuid,
        output: Option<DownloadOutput>,
    ) -> Result<ApiResult> {
        let output = output.unwrap_or_default();
        let path = with_query(
            &format!("/envelopes/{}/download-url", envelope_id),
            &[("output", Some(output.as_str().to_string()))],
        );
        self.client.get(&path).await
    }

    /// Download the signed documents.
    ///
    /// Normally yields [`ApiResult::Binary`] with a PDF or ZIP payload.
    pub async fn download(&self, envelope_id: &Uuid, options: DownloadOptions) -> Result<ApiResult> {
        self.client
            .execute(Method::GET, &download_path(envelope_id, &options), None)
            .await
    }
}

fn download_path(envelope_id: &Uuid, options: &DownloadOptions) -> String {
    let output = options.output.unwrap_or_default();
    with_query(
        &format!("/envelopes/{}/download", envelope_id),
        &[
            ("output", Some(output.as_str().to_string())),
            ("include_log", options.include_log.map(|b| b.to_string())),
        ],
    )
}

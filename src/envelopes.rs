//! Envelope operations.
//!
//! This module provides the EnvelopesClient for creating, reading, updating,
//! sending, cancelling and deleting envelopes.

use reqwest::Method;
use uuid::Uuid;

use crate::client::{ApiResult, Client, with_query};
use crate::error::Result;
use crate::types::{CreateEnvelopeRequest, Envelope, EnvelopePage, ListEnvelopesQuery, UpdateEnvelopeRequest};

// Each typed method has a `*_raw` twin returning the normalized response as-is.

/// Client for envelope operations.
///
/// Access via `client.envelopes()`.
pub struct EnvelopesClient {
    client: Client,
}

impl EnvelopesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List envelopes.
    ///
    /// Only the filters that are set appear in the query string.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, Credentials};
    /// use esign::types::{EnvelopeStatus, ListEnvelopesQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
    ///
    ///     let sent = client.envelopes().list(ListEnvelopesQuery {
    ///         status: Some(EnvelopeStatus::Sent),
    ///         ..Default::default()
    ///     }).await?;
    ///     for envelope in sent.items {
    ///         println!("{} {:?}", envelope.id, envelope.name);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list(&self, query: ListEnvelopesQuery) -> Result<EnvelopePage> {
        self.list_raw(query).await?.into_json()
    }

    pub async fn list_raw(&self, query: ListEnvelopesQuery) -> Result<ApiResult> {
        self.client.get(&list_path(&query)).await
    }

    /// Get an envelope by ID.
    pub async fn get(&self, envelope_id: &Uuid) -> Result<Envelope> {
        self.get_raw(envelope_id).await?.into_json()
    }

    pub async fn get_raw(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .get(&format!("/envelopes/{}", envelope_id))
            .await
    }

    /// Create a draft envelope.
    pub async fn create(&self, request: CreateEnvelopeRequest) -> Result<Envelope> {
        self.create_raw(request).await?.into_json()
    }

    pub async fn create_raw(&self, request: CreateEnvelopeRequest) -> Result<ApiResult> {
        self.client.send(Method::POST, "/envelopes", &request).await
    }

    /// Update fields of a draft envelope. Unset fields are left untouched.
    pub async fn update(
        &self,
        envelope_id: &Uuid,
        request: UpdateEnvelopeRequest,
    ) -> Result<Envelope> {
        self.update_raw(envelope_id, request).await?.into_json()
    }

    pub async fn update_raw(
        &self,
        envelope_id: &Uuid,
        request: UpdateEnvelopeRequest,
    ) -> Result<ApiResult> {
        self.client
            .send(Method::PATCH, &format!("/envelopes/{}", envelope_id), &request)
            .await
    }

    /// Delete an envelope.
    ///
    /// **Warning:** This operation is irreversible.
    pub async fn delete(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .execute(Method::DELETE, &format!("/envelopes/{}", envelope_id), None)
            .await
    }

    /// Send the envelope to its recipients.
    ///
    /// The service rejects envelopes without at least one document, one
    /// signer and one tag; that rejection surfaces as
    /// [`ESignError::Api`](crate::ESignError::Api).
    pub async fn send(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .execute(Method::POST, &format!("/envelopes/{}/send", envelope_id), None)
            .await
    }

    /// Cancel a sent envelope.
    pub async fn cancel(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .execute(Method::POST, &format!("/envelopes/{}/cancel", envelope_id), None)
            .await
    }
}

fn list_path(query: &ListEnvelopesQuery) -> String {
    with_query(
        "/envelopes",
        &[
            ("status", query.status.map(|s| s.as_str().to_string())),
            ("page", query.page.map(|p| p.to_string())),
            ("per_page", query.per_page.map(|p| p.to_string())),
        ],
    )
}

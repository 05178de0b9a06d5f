//! Recipient operations.

use reqwest::Method;
use uuid::Uuid;

use crate::client::{ApiResult, Client};
use crate::error::Result;
use crate::types::{AddRecipientRequest, Listing, Recipient};

/// Client for recipient operations.
///
/// Access via `client.recipients()`.
pub struct RecipientsClient {
    client: Client,
}

impl RecipientsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Add a recipient to an envelope.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, Credentials};
    /// use esign::types::{AddRecipientRequest, RecipientRole};
    /// use uuid::Uuid;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
    ///     let envelope_id = Uuid::parse_str("...")?;
    ///
    ///     let signer = client.recipients().add(&envelope_id, AddRecipientRequest {
    ///         role: RecipientRole::Signer,
    ///         name: "Ada Lovelace".to_string(),
    ///         email: "ada@example.com".to_string(),
    ///         mobile: None,
    ///     }).await?;
    ///     println!("Signer {}", signer.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn add(&self, envelope_id: &Uuid, request: AddRecipientRequest) -> Result<Recipient> {
        self.add_raw(envelope_id, request).await?.into_json()
    }

    pub async fn add_raw(
        &self,
        envelope_id: &Uuid,
        request: AddRecipientRequest,
    ) -> Result<ApiResult> {
        self.client
            .send(
                Method::POST,
                &format!("/envelopes/{}/recipients", envelope_id),
                &request,
            )
            .await
    }

    /// List the recipients of an envelope.
    pub async fn list(&self, envelope_id: &Uuid) -> Result<Vec<Recipient>> {
        let listing: Listing<Recipient> = self.list_raw(envelope_id).await?.into_json()?;
        Ok(listing.into_items())
    }

    pub async fn list_raw(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .get(&format!("/envelopes/{}/recipients", envelope_id))
            .await
    }

    /// Get a single recipient.
    pub async fn get(&self, envelope_id: &Uuid, recipient_id: &Uuid) -> Result<Recipient> {
        self.get_raw(envelope_id, recipient_id).await?.into_json()
    }

    pub async fn get_raw(&self, envelope_id: &Uuid, recipient_id: &Uuid) -> Result<ApiResult> {
        self.client
            .get(&format!(
                "/envelopes/{}/recipients/{}",
                envelope_id, recipient_id
            ))
            .await
    }
}

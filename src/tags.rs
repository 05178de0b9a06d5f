//! Tag placement operations.
//!
//! A tag is positioned either by a placeholder string found in the
//! document's text layer or by page coordinates in points. The two modes
//! produce different request bodies; see [`TagPlacement`].

use reqwest::Method;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::client::{ApiResult, Client};
use crate::error::Result;
use crate::types::{
    AddTagRequest, AddTagsByPlaceholderRequest, Listing, Tag, TagPlacement, document_reference,
};

/// Client for tag operations.
///
/// Access via `client.tags()`.
pub struct TagsClient {
    client: Client,
}

impl TagsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Add a tag for a recipient.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, Credentials};
    /// use esign::types::{AddTagRequest, Alignment, TagPlacement};
    /// use uuid::Uuid;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
    ///     let envelope_id = Uuid::parse_str("...")?;
    ///     let signer_id = Uuid::parse_str("...")?;
    ///     let document_id = Uuid::parse_str("...")?;
    ///
    ///     let tag = client.tags().add(&envelope_id, AddTagRequest {
    ///         recipient_id: signer_id,
    ///         tag_type: None,
    ///         placement: TagPlacement::Placeholder {
    ///             text: "{sign_here}".to_string(),
    ///             alignment: Some(Alignment::BottomLeft),
    ///             document_id: Some(document_id),
    ///         },
    ///     }).await?;
    ///     println!("Tag {}", tag.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn add(&self, envelope_id: &Uuid, request: AddTagRequest) -> Result<Tag> {
        self.add_raw(envelope_id, request).await?.into_json()
    }

    pub async fn add_raw(&self, envelope_id: &Uuid, request: AddTagRequest) -> Result<ApiResult> {
        let body = tag_body(envelope_id, &request);
        self.client
            .send(Method::POST, &format!("/envelopes/{}/tags", envelope_id), &body)
            .await
    }

    /// Place the same placeholder tag on several documents at once.
    pub async fn add_by_placeholder(
        &self,
        envelope_id: &Uuid,
        request: AddTagsByPlaceholderRequest,
    ) -> Result<Vec<Tag>> {
        let listing: Listing<Tag> = self
            .add_by_placeholder_raw(envelope_id, request)
            .await?
            .into_json()?;
        Ok(listing.into_items())
    }

    pub async fn add_by_placeholder_raw(
        &self,
        envelope_id: &Uuid,
        request: AddTagsByPlaceholderRequest,
    ) -> Result<ApiResult> {
        let body = by_placeholder_body(envelope_id, &request);
        self.client
            .send(
                Method::POST,
                &format!("/envelopes/{}/tags/by-placeholder", envelope_id),
                &body,
            )
            .await
    }

    /// List the tags of an envelope.
    pub async fn list(&self, envelope_id: &Uuid) -> Result<Vec<Tag>> {
        let listing: Listing<Tag> = self.list_raw(envelope_id).await?.into_json()?;
        Ok(listing.into_items())
    }

    pub async fn list_raw(&self, envelope_id: &Uuid) -> Result<ApiResult> {
        self.client
            .get(&format!("/envelopes/{}/tags", envelope_id))
            .await
    }
}

fn tag_body(envelope_id: &Uuid, request: &AddTagRequest) -> Value {
    let mut body = Map::new();
    body.insert("recipient_id".into(), json!(request.recipient_id));
    body.insert("type".into(), json!(request.tag_type.unwrap_or_default()));

    match &request.placement {
        TagPlacement::Placeholder {
            text,
            alignment,
            document_id,
        } => {
            body.insert("placeholder".into(), json!(text));
            if let Some(alignment) = alignment {
                body.insert("positioning".into(), json!(alignment));
            }
            if let Some(document_id) = document_id {
                body.insert(
                    "document".into(),
                    json!(document_reference(envelope_id, document_id)),
                );
            }
        }
        TagPlacement::Coordinate {
            document_id,
            page,
            x,
            y,
        } => {
            body.insert(
                "document".into(),
                json!(document_reference(envelope_id, document_id)),
            );
            body.insert("page".into(), json!(page));
            body.insert("x_position".into(), json!(x));
            body.insert("y_position".into(), json!(y));
        }
    }

    Value::Object(body)
}

fn by_placeholder_body(envelope_id: &Uuid, request: &AddTagsByPlaceholderRequest) -> Value {
    let documents: Vec<String> = request
        .document_ids
        .iter()
        .map(|id| document_reference(envelope_id, id))
        .collect();

    let mut body = json!({
        "recipient_id": request.recipient_id,
        "type": request.tag_type.unwrap_or_default(),
        "placeholder": request.placeholder,
        "documents": documents,
    });
    if let Some(alignment) = request.alignment {
        body["positioning"] = json!(alignment);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Alignment, TagType};

    fn ids() -> (Uuid, Uuid, Uuid) {
        (
            Uuid::parse_str("00000000-0000-0000-0000-0000000000e1").unwrap(),
            Uuid::parse_str("00000000-0000-0000-0000-0000000000a1").unwrap(),
            Uuid::parse_str("00000000-0000-0000-0000-0000000000d1").unwrap(),
        )
    }

    #[test]
    fn test_placeholder_body() {
        let (envelope, recipient, document) = ids();
        let body = tag_body(&envelope, &AddTagRequest {
            recipient_id: recipient,
            tag_type: None,
            placement: TagPlacement::Placeholder {
                text: "{sign_here}".to_string(),
                alignment: Some(Alignment::BottomLeft),
                document_id: Some(document),
            },
        });

        assert_eq!(
            body,
            json!({
                "recipient_id": recipient,
                "type": "signature",
                "placeholder": "{sign_here}",
                "positioning": "bottom_left",
                "document": format!("/envelopes/{}/documents/{}", envelope, document),
            })
        );
        assert!(body.get("page").is_none());
    }

    #[test]
    fn test_placeholder_body_without_document_or_alignment() {
        let (envelope, recipient, _) = ids();
        let body = tag_body(&envelope, &AddTagRequest {
            recipient_id: recipient,
            tag_type: Some(TagType::Approval),
            placement: TagPlacement::Placeholder {
                text: "{approve}".to_string(),
                alignment: None,
                document_id: None,
            },
        });

        assert_eq!(body["type"], "approval");
        assert!(body.get("positioning").is_none());
        assert!(body.get("document").is_none());
    }

    #[test]
    fn test_coordinate_body() {
        let (envelope, recipient, document) = ids();
        let body = tag_body(&envelope, &AddTagRequest {
            recipient_id: recipient,
            tag_type: Some(TagType::DateOfSignature),
            placement: TagPlacement::Coordinate {
                document_id: document,
                page: 2,
                x: 120.0,
                y: 640.5,
            },
        });

        assert_eq!(body["type"], "date_of_signature");
        assert_eq!(body["page"], 2);
        assert_eq!(body["x_position"], 120.0);
        assert_eq!(body["y_position"], 640.5);
        assert!(body.get("placeholder").is_none());
        assert!(body.get("positioning").is_none());
    }

    #[test]
    fn test_by_placeholder_body() {
        let (envelope, recipient, document) = ids();
        let other = Uuid::parse_str("00000000-0000-0000-0000-0000000000d2").unwrap();
        let body = by_placeholder_body(&envelope, &AddTagsByPlaceholderRequest {
            recipient_id: recipient,
            tag_type: None,
            placeholder: "{initials}".to_string(),
            alignment: None,
            document_ids: vec![document, other],
        });

        assert_eq!(body["type"], "signature");
        assert_eq!(body["documents"].as_array().map(Vec::len), Some(2));
        assert!(body.get("positioning").is_none());
    }
}

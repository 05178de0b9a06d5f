//! Type definitions for the esign client.
//!
//! Request types skip unset optional fields so the service never sees
//! explicit nulls. Response types keep unmodelled fields in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Envelope lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    #[default]
    Draft,
    Sent,
    Completed,
    Expired,
    Declined,
    Cancelled,
}

impl EnvelopeStatus {
    /// Wire value of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeStatus::Draft => "draft",
            EnvelopeStatus::Sent => "sent",
            EnvelopeStatus::Completed => "completed",
            EnvelopeStatus::Expired => "expired",
            EnvelopeStatus::Declined => "declined",
            EnvelopeStatus::Cancelled => "cancelled",
        }
    }
}

/// A signature envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope {
    /// Envelope ID.
    pub id: Uuid,
    /// Envelope name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current status. Draft when the service omits it.
    #[serde(default)]
    pub status: EnvelopeStatus,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for listing envelopes. Absent filters are not sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListEnvelopesQuery {
    /// Filter by status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EnvelopeStatus>,
    /// Page number (1-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(default, alias = "items_per_page", skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// A page of envelopes.
///
/// Decodes from either a bare array or an object carrying `items` (or
/// `data`) next to its pagination fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "Listing<Envelope>")]
pub struct EnvelopePage {
    /// Envelopes in this page.
    pub items: Vec<Envelope>,
    /// Pagination metadata as returned by the service.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl From<Listing<Envelope>> for EnvelopePage {
    fn from(listing: Listing<Envelope>) -> Self {
        match listing {
            Listing::Bare(items) => Self {
                items,
                meta: Map::new(),
            },
            Listing::Wrapped { items, meta } => Self { items, meta },
        }
    }
}

/// Wire shape of a collection response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default, alias = "data")]
        items: Vec<T>,
        #[serde(flatten)]
        meta: Map<String, Value>,
    },
}

impl<T> Listing<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { items, .. } => items,
        }
    }
}

/// Request to create an envelope.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateEnvelopeRequest {
    /// Envelope name.
    pub name: String,
    /// Subject of the signature request email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    /// Body of the signature request email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    /// Sender display name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Sender email override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    /// Expiry date (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Partial envelope update; only set fields are sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateEnvelopeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// An uploaded file, not yet attached to an envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct File {
    /// File ID.
    pub id: String,
    /// Original file name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl File {
    /// Reference path used when attaching the file as a document.
    pub fn reference(&self) -> String {
        file_reference(&self.id)
    }
}

pub(crate) fn file_reference(file_id: &str) -> String {
    format!("/files/{}", file_id)
}

pub(crate) fn document_reference(envelope_id: &Uuid, document_id: &Uuid) -> String {
    format!("/envelopes/{}/documents/{}", envelope_id, document_id)
}

/// A document inside an envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Document {
    /// Document ID.
    pub id: Uuid,
    /// Document name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request to attach an uploaded file as a document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddDocumentRequest {
    /// ID returned by the file upload.
    pub file_id: String,
    /// Display name of the document.
    pub name: String,
}

/// What a download contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadOutput {
    /// All documents merged into one PDF.
    #[default]
    Combined,
    /// One file per document (ZIP).
    Separate,
    /// Only the audit log.
    OnlyLog,
}

impl DownloadOutput {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadOutput::Combined => "combined",
            DownloadOutput::Separate => "separate",
            DownloadOutput::OnlyLog => "only_log",
        }
    }
}

/// Options for downloading signed documents.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DownloadOptions {
    /// Output layout (default: combined).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<DownloadOutput>,
    /// Whether to append the audit log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_log: Option<bool>,
}

/// Time-limited download link. Expiry is enforced by the service only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadUrl {
    pub url: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recipient role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    #[default]
    Signer,
    InPerson,
    Cc,
    Approver,
}

/// A recipient of an envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recipient {
    /// Recipient ID.
    pub id: Uuid,
    #[serde(default)]
    pub role: RecipientRole,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request to add a recipient.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddRecipientRequest {
    pub role: RecipientRole,
    pub name: String,
    pub email: String,
    /// Mobile number in international format; needed for SMS authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

/// Kind of tag placed on a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    #[default]
    Signature,
    Approval,
    Text,
    DateOfSignature,
    Checkbox,
}

/// Anchor of a placeholder tag relative to the matched text.
///
/// Serialized as `{vertical}_{horizontal}`, e.g. `bottom_left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Where a tag goes. The two modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum TagPlacement {
    /// Locate the tag by text found in the document.
    Placeholder {
        text: String,
        alignment: Option<Alignment>,
        document_id: Option<Uuid>,
    },
    /// Place the tag at fixed coordinates (points) on a page.
    Coordinate {
        document_id: Uuid,
        page: u32,
        x: f64,
        y: f64,
    },
}

/// Request to add a single tag.
#[derive(Debug, Clone, PartialEq)]
pub struct AddTagRequest {
    pub recipient_id: Uuid,
    /// Defaults to `signature`.
    pub tag_type: Option<TagType>,
    pub placement: TagPlacement,
}

/// Request to place one placeholder tag across several documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTagsByPlaceholderRequest {
    pub recipient_id: Uuid,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<TagType>,
    pub placeholder: String,
    #[serde(default, rename = "positioning", skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    pub document_ids: Vec<Uuid>,
}

/// A tag on a document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    pub id: Uuid,
    #[serde(default, rename = "type")]
    pub tag_type: TagType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Account details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    #[serde(default)]
    pub credits: Option<Value>,
    #[serde(default)]
    pub plan: Option<Value>,
    #[serde(default)]
    pub usage: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

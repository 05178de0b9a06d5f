//! # esign
//!
//! Credential-scoped client for an e-signature envelope API, plus a tool
//! dispatch layer that lets an AI agent host drive the signing workflow.
//!
//! The client exchanges an access/secret key pair for a short-lived bearer
//! token, caches it until shortly before it expires, and normalizes every
//! response into one of three shapes: binary document bytes, no content, or
//! a JSON payload.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esign::{Client, Credentials};
//! use esign::types::{
//!     AddDocumentRequest, AddRecipientRequest, AddTagRequest, Alignment,
//!     CreateEnvelopeRequest, RecipientRole, TagPlacement,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
//!
//!     let envelope = client.envelopes().create(CreateEnvelopeRequest {
//!         name: "Service agreement".to_string(),
//!         ..Default::default()
//!     }).await?;
//!
//!     let file = client.documents().upload_file("agreement.pdf").await?;
//!     let document = client.documents().add(&envelope.id, AddDocumentRequest {
//!         file_id: file.id,
//!         name: "Agreement".to_string(),
//!     }).await?;
//!
//!     let signer = client.recipients().add(&envelope.id, AddRecipientRequest {
//!         role: RecipientRole::Signer,
//!         name: "Ada Lovelace".to_string(),
//!         email: "ada@example.com".to_string(),
//!         mobile: None,
//!     }).await?;
//!
//!     client.tags().add(&envelope.id, AddTagRequest {
//!         recipient_id: signer.id,
//!         tag_type: None,
//!         placement: TagPlacement::Placeholder {
//!             text: "{sign_here}".to_string(),
//!             alignment: Some(Alignment::BottomLeft),
//!             document_id: Some(document.id),
//!         },
//!     }).await?;
//!
//!     client.envelopes().send(&envelope.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ESignError>`:
//!
//! ```rust,no_run
//! use esign::{Client, Credentials, ESignError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx")).unwrap();
//!
//!     match client.account().get().await {
//!         Ok(account) => println!("Plan: {:?}", account.plan),
//!         Err(ESignError::Auth { status, .. }) => println!("Credentials rejected ({})", status),
//!         Err(ESignError::Api { status, body }) => println!("API error {}: {}", status, body),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

pub mod account;
pub mod auth;
pub mod client;
pub mod documents;
pub mod envelopes;
pub mod error;
pub mod recipients;
pub mod tags;
pub mod tools;
pub mod types;

// Re-export main types at the crate root
pub use auth::{CachedToken, Credentials, TokenCache};
pub use client::{ApiResult, Client, ClientConfig, RequestBody};
pub use error::{ESignError, Result};
pub use tools::{Tool, ToolOutput, dispatch};

pub use types::{
    Account, AddDocumentRequest, AddRecipientRequest, AddTagRequest, AddTagsByPlaceholderRequest,
    Alignment, CreateEnvelopeRequest, Document, DownloadOptions, DownloadOutput, DownloadUrl,
    Envelope, EnvelopePage, EnvelopeStatus, File, ListEnvelopesQuery, Recipient, RecipientRole,
    Tag, TagPlacement, TagType, UpdateEnvelopeRequest,
};

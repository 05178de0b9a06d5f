//! End-to-end signing workflow against a live account.
//!
//! This example demonstrates:
//! - Creating a client from the environment
//! - Uploading a PDF and attaching it to a new envelope
//! - Adding a signer and a placeholder signature tag
//! - Sending the envelope
//!
//! Run with:
//! ```bash
//! ESIGN_ACCESS_KEY=ak_xxx ESIGN_SECRET_KEY=sk_xxx SIGNER_EMAIL=you@example.com \
//!     RUST_LOG=esign=debug cargo run --example workflow -- contract.pdf
//! ```

use esign::{
    AddDocumentRequest, AddRecipientRequest, AddTagRequest, Alignment, Client,
    CreateEnvelopeRequest, RecipientRole, TagPlacement,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pdf_path = std::env::args()
        .nth(1)
        .ok_or("usage: workflow <path-to-pdf>")?;
    let signer_email = std::env::var("SIGNER_EMAIL")?;

    let client = Client::from_env()?;

    let account = client.account().get().await?;
    println!("Plan: {:?}, credits: {:?}", account.plan, account.credits);

    println!("\nCreating envelope...");
    let envelope = client
        .envelopes()
        .create(CreateEnvelopeRequest {
            name: "Example agreement".to_string(),
            email_body: Some("Please review and sign.".to_string()),
            ..Default::default()
        })
        .await?;
    println!("  ID:     {}", envelope.id);
    println!("  Status: {:?}", envelope.status);

    println!("\nUploading {}...", pdf_path);
    let file = client.documents().upload_file(&pdf_path).await?;
    let document = client
        .documents()
        .add(
            &envelope.id,
            AddDocumentRequest {
                file_id: file.id,
                name: "Agreement".to_string(),
            },
        )
        .await?;
    println!("  Document: {}", document.id);

    println!("\nAdding signer {}...", signer_email);
    let signer = client
        .recipients()
        .add(
            &envelope.id,
            AddRecipientRequest {
                role: RecipientRole::Signer,
                name: "Example Signer".to_string(),
                email: signer_email,
                mobile: None,
            },
        )
        .await?;

    let tag = client
        .tags()
        .add(
            &envelope.id,
            AddTagRequest {
                recipient_id: signer.id,
                tag_type: None,
                placement: TagPlacement::Placeholder {
                    text: "{sign_here}".to_string(),
                    alignment: Some(Alignment::BottomLeft),
                    document_id: Some(document.id),
                },
            },
        )
        .await?;
    println!("  Tag: {}", tag.id);

    println!("\nSending envelope...");
    client.envelopes().send(&envelope.id).await?;

    let link = client.documents().download_url(&envelope.id, None).await?;
    println!("Download link (valid for a few minutes): {}", link.url);

    println!("\nDone!");
    Ok(())
}

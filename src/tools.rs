//! Tool catalogue and dispatch for agent hosts.
//!
//! A host hands over a tool name and a JSON argument object; [`dispatch`]
//! decodes the arguments into the typed request, calls exactly one client
//! operation and turns the outcome into a serializable [`ToolOutput`].
//! Success bodies are relayed exactly as the service returned them.
//! Framing the call on the wire is left to the host.

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{ApiResult, Client};
use crate::error::{ESignError, Result};
use crate::types::{
    AddDocumentRequest, AddRecipientRequest, AddTagRequest, AddTagsByPlaceholderRequest,
    Alignment, CreateEnvelopeRequest, DownloadOptions, DownloadOutput, ListEnvelopesQuery,
    TagPlacement, TagType, UpdateEnvelopeRequest,
};

/// Every operation exposed to the agent host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    ListEnvelopes,
    GetEnvelope,
    CreateEnvelope,
    UpdateEnvelope,
    DeleteEnvelope,
    SendEnvelope,
    CancelEnvelope,
    UploadFile,
    AddDocument,
    ListDocuments,
    GetDownloadUrl,
    DownloadEnvelope,
    AddRecipient,
    ListRecipients,
    GetRecipient,
    AddTag,
    AddTagByPlaceholder,
    ListTags,
    GetAccount,
}

impl Tool {
    /// All tools, in catalogue order.
    pub const ALL: [Tool; 19] = [
        Tool::ListEnvelopes,
        Tool::GetEnvelope,
        Tool::CreateEnvelope,
        Tool::UpdateEnvelope,
        Tool::DeleteEnvelope,
        Tool::SendEnvelope,
        Tool::CancelEnvelope,
        Tool::UploadFile,
        Tool::AddDocument,
        Tool::ListDocuments,
        Tool::GetDownloadUrl,
        Tool::DownloadEnvelope,
        Tool::AddRecipient,
        Tool::ListRecipients,
        Tool::GetRecipient,
        Tool::AddTag,
        Tool::AddTagByPlaceholder,
        Tool::ListTags,
        Tool::GetAccount,
    ];

    /// Name the host uses to invoke the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::ListEnvelopes => "list_envelopes",
            Tool::GetEnvelope => "get_envelope",
            Tool::CreateEnvelope => "create_envelope",
            Tool::UpdateEnvelope => "update_envelope",
            Tool::DeleteEnvelope => "delete_envelope",
            Tool::SendEnvelope => "send_envelope",
            Tool::CancelEnvelope => "cancel_envelope",
            Tool::UploadFile => "upload_file",
            Tool::AddDocument => "add_document",
            Tool::ListDocuments => "list_documents",
            Tool::GetDownloadUrl => "get_download_url",
            Tool::DownloadEnvelope => "download_envelope",
            Tool::AddRecipient => "add_recipient",
            Tool::ListRecipients => "list_recipients",
            Tool::GetRecipient => "get_recipient",
            Tool::AddTag => "add_tag",
            Tool::AddTagByPlaceholder => "add_tag_by_placeholder",
            Tool::ListTags => "list_tags",
            Tool::GetAccount => "get_account",
        }
    }

    /// Look a tool up by its name.
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Human-readable description shown to the agent.
    pub fn description(&self) -> &'static str {
        match self {
            Tool::ListEnvelopes => {
                "List envelopes, optionally filtered by status, with pagination (page, per_page)."
            }
            Tool::GetEnvelope => "Get an envelope with its status and settings.",
            Tool::CreateEnvelope => {
                "Create a draft envelope. Add documents, recipients and tags before sending."
            }
            Tool::UpdateEnvelope => "Update name, email or sender fields of a draft envelope.",
            Tool::DeleteEnvelope => "Delete an envelope. This cannot be undone.",
            Tool::SendEnvelope => {
                "Send an envelope. Requires at least one document, one signer and one tag."
            }
            Tool::CancelEnvelope => "Cancel a sent envelope.",
            Tool::UploadFile => {
                "Upload a local PDF. Returns a file id to attach with add_document."
            }
            Tool::AddDocument => "Attach an uploaded file to an envelope as a document.",
            Tool::ListDocuments => "List the documents of an envelope.",
            Tool::GetDownloadUrl => {
                "Get a download link for signed documents. The link expires after a few minutes."
            }
            Tool::DownloadEnvelope => {
                "Download signed documents as PDF (combined) or ZIP (separate), optionally with the audit log."
            }
            Tool::AddRecipient => {
                "Add a recipient (signer, in_person, cc or approver). Mobile is needed for SMS authentication."
            }
            Tool::ListRecipients => "List the recipients of an envelope.",
            Tool::GetRecipient => "Get a single recipient of an envelope.",
            Tool::AddTag => {
                "Place a tag for a recipient, either on a placeholder text (recommended, pass document_id) \
                 or at page coordinates (document_id, page, x_position, y_position)."
            }
            Tool::AddTagByPlaceholder => {
                "Place the same placeholder tag on several documents in one call."
            }
            Tool::ListTags => "List the tags of an envelope.",
            Tool::GetAccount => "Get credits, plan and usage of the account.",
        }
    }
}

/// Result handed back to the agent host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolOutput {
    /// Structured payload.
    Json { value: Value },
    /// Document bytes, base64-encoded for transport.
    Binary {
        content_type: String,
        data_base64: String,
        size: usize,
    },
    /// Accepted, nothing to show.
    Empty,
}

impl From<ApiResult> for ToolOutput {
    fn from(result: ApiResult) -> Self {
        match result {
            ApiResult::Binary {
                content_type,
                bytes,
            } => ToolOutput::Binary {
                content_type,
                data_base64: BASE64.encode(&bytes),
                size: bytes.len(),
            },
            ApiResult::Empty => ToolOutput::Empty,
            ApiResult::Json(value) => ToolOutput::Json { value },
        }
    }
}

#[derive(Debug, Deserialize)]
struct EnvelopeArgs {
    envelope_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct UpdateEnvelopeArgs {
    envelope_id: Uuid,
    #[serde(flatten)]
    update: UpdateEnvelopeRequest,
}

#[derive(Debug, Deserialize)]
struct UploadFileArgs {
    file_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct AddDocumentArgs {
    envelope_id: Uuid,
    #[serde(flatten)]
    document: AddDocumentRequest,
}

#[derive(Debug, Deserialize)]
struct DownloadUrlArgs {
    envelope_id: Uuid,
    #[serde(default)]
    output: Option<DownloadOutput>,
}

#[derive(Debug, Deserialize)]
struct DownloadArgs {
    envelope_id: Uuid,
    #[serde(flatten)]
    options: DownloadOptions,
}

#[derive(Debug, Deserialize)]
struct AddRecipientArgs {
    envelope_id: Uuid,
    #[serde(flatten)]
    recipient: AddRecipientRequest,
}

#[derive(Debug, Deserialize)]
struct RecipientArgs {
    envelope_id: Uuid,
    recipient_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct AddTagsByPlaceholderArgs {
    envelope_id: Uuid,
    #[serde(flatten)]
    request: AddTagsByPlaceholderRequest,
}

/// Flat `add_tag` arguments as an agent supplies them.
#[derive(Debug, Default, Deserialize)]
pub struct AddTagArgs {
    pub envelope_id: Uuid,
    pub recipient_id: Uuid,
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default, rename = "type")]
    pub tag_type: Option<TagType>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub positioning: Option<Alignment>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub x_position: Option<f64>,
    #[serde(default)]
    pub y_position: Option<f64>,
}

impl AddTagArgs {
    /// Pick the placement mode.
    ///
    /// A placeholder selects placeholder mode and any coordinates are
    /// dropped. Without one, all coordinate fields are required.
    pub fn into_request(self) -> Result<AddTagRequest> {
        let placement = match self.placeholder {
            Some(text) => {
                if self.page.is_some() || self.x_position.is_some() || self.y_position.is_some() {
                    warn!(
                        placeholder = %text,
                        "placeholder given together with coordinates; ignoring page/x_position/y_position"
                    );
                }
                TagPlacement::Placeholder {
                    text,
                    alignment: self.positioning,
                    document_id: self.document_id,
                }
            }
            None => TagPlacement::Coordinate {
                document_id: required(self.document_id, "document_id")?,
                page: required(self.page, "page")?,
                x: required(self.x_position, "x_position")?,
                y: required(self.y_position, "y_position")?,
            },
        };

        Ok(AddTagRequest {
            recipient_id: self.recipient_id,
            tag_type: self.tag_type,
            placement,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| {
        ESignError::InvalidRequest(format!(
            "{} is required when no placeholder is given",
            field
        ))
    })
}

fn decode<T: DeserializeOwned>(tool: Tool, args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| ESignError::InvalidRequest(format!("{}: {}", tool.name(), e)))
}

/// Run the named tool against the client.
pub async fn dispatch(client: &Client, name: &str, args: Value) -> Result<ToolOutput> {
    let tool = Tool::from_name(name).ok_or_else(|| ESignError::UnknownTool(name.to_string()))?;
    debug!(tool = tool.name(), "dispatching tool call");

    match tool {
        Tool::ListEnvelopes => {
            let query: ListEnvelopesQuery = decode(tool, args)?;
            Ok(client.envelopes().list_raw(query).await?.into())
        }
        Tool::GetEnvelope => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.envelopes().get_raw(&args.envelope_id).await?.into())
        }
        Tool::CreateEnvelope => {
            let request: CreateEnvelopeRequest = decode(tool, args)?;
            Ok(client.envelopes().create_raw(request).await?.into())
        }
        Tool::UpdateEnvelope => {
            let args: UpdateEnvelopeArgs = decode(tool, args)?;
            Ok(client
                .envelopes()
                .update_raw(&args.envelope_id, args.update)
                .await?
                .into())
        }
        Tool::DeleteEnvelope => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.envelopes().delete(&args.envelope_id).await?.into())
        }
        Tool::SendEnvelope => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.envelopes().send(&args.envelope_id).await?.into())
        }
        Tool::CancelEnvelope => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.envelopes().cancel(&args.envelope_id).await?.into())
        }
        Tool::UploadFile => {
            let args: UploadFileArgs = decode(tool, args)?;
            Ok(client.documents().upload_file_raw(&args.file_path).await?.into())
        }
        Tool::AddDocument => {
            let args: AddDocumentArgs = decode(tool, args)?;
            Ok(client.documents().add_raw(&args.envelope_id, args.document).await?.into())
        }
        Tool::ListDocuments => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.documents().list_raw(&args.envelope_id).await?.into())
        }
        Tool::GetDownloadUrl => {
            let args: DownloadUrlArgs = decode(tool, args)?;
            Ok(client
                .documents()
                .download_url_raw(&args.envelope_id, args.output)
                .await?
                .into())
        }
        Tool::DownloadEnvelope => {
            let args: DownloadArgs = decode(tool, args)?;
            Ok(client
                .documents()
                .download(&args.envelope_id, args.options)
                .await?
                .into())
        }
        Tool::AddRecipient => {
            let args: AddRecipientArgs = decode(tool, args)?;
            Ok(client
                .recipients()
                .add_raw(&args.envelope_id, args.recipient)
                .await?
                .into())
        }
        Tool::ListRecipients => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.recipients().list_raw(&args.envelope_id).await?.into())
        }
        Tool::GetRecipient => {
            let args: RecipientArgs = decode(tool, args)?;
            Ok(client
                .recipients()
                .get_raw(&args.envelope_id, &args.recipient_id)
                .await?
                .into())
        }
        Tool::AddTag => {
            let args: AddTagArgs = decode(tool, args)?;
            let envelope_id = args.envelope_id;
            let request = args.into_request()?;
            Ok(client.tags().add_raw(&envelope_id, request).await?.into())
        }
        Tool::AddTagByPlaceholder => {
            let args: AddTagsByPlaceholderArgs = decode(tool, args)?;
            Ok(client
                .tags()
                .add_by_placeholder_raw(&args.envelope_id, args.request)
                .await?
                .into())
        }
        Tool::ListTags => {
            let args: EnvelopeArgs = decode(tool, args)?;
            Ok(client.tags().list_raw(&args.envelope_id).await?.into())
        }
        Tool::GetAccount => Ok(client.account().get_raw().await?.into()),
    }
}

//! Error types for the esign client.
//!
//! Every operation either returns a normalized value or fails with exactly
//! one of these categories.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for esign operations.
pub type Result<T> = std::result::Result<T, ESignError>;

/// Errors that can occur when using the esign client.
#[derive(Error, Debug)]
pub enum ESignError {
    /// The token exchange was rejected (bad or revoked key pair).
    #[error("Authentication failed ({status}): {body}")]
    Auth {
        /// HTTP status code of the token exchange.
        status: u16,
        /// Response body, parsed as JSON when possible.
        body: serde_json::Value,
    },

    /// Non-success response from the signature service.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, parsed as JSON when possible.
        body: serde_json::Value,
    },

    /// Local file could not be read for upload.
    #[error("Failed to read {}: {source}", .path.display())]
    Filesystem {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response shape did not match what the operation expects.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid request arguments.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No tool with the given name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

impl ESignError {
    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ESignError::Auth { .. } | ESignError::Api { status: 401, .. }
        )
    }

    /// Returns the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ESignError::Auth { status, .. } | ESignError::Api { status, .. } => Some(*status),
            ESignError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the response body carried by auth and API errors.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ESignError::Auth { body, .. } | ESignError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = ESignError::Api {
            status: 404,
            body: json!({"message": "Envelope not found"}),
        };
        assert_eq!(
            err.to_string(),
            r#"API error (404): {"message":"Envelope not found"}"#
        );
    }

    #[test]
    fn test_filesystem_error_display() {
        let err = ESignError::Filesystem {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Failed to read /tmp/missing.pdf: not found");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_is_auth_error() {
        let auth = ESignError::Auth {
            status: 401,
            body: json!("invalid key"),
        };
        assert!(auth.is_auth_error());

        let api_401 = ESignError::Api {
            status: 401,
            body: json!(null),
        };
        assert!(api_401.is_auth_error());

        let api_422 = ESignError::Api {
            status: 422,
            body: json!({"message": "no tags"}),
        };
        assert!(!api_422.is_auth_error());
    }

    #[test]
    fn test_status_code_and_body() {
        let err = ESignError::Api {
            status: 500,
            body: json!("boom"),
        };
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.body(), Some(&json!("boom")));

        let invalid = ESignError::InvalidRequest("page is required".to_string());
        assert_eq!(invalid.status_code(), None);
        assert!(invalid.body().is_none());
    }
}

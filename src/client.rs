//! esign API client.
//!
//! The main entry point for interacting with the signature service. Every
//! request goes through [`Client::execute`], which attaches a bearer token
//! and normalizes the response into an [`ApiResult`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::account::AccountClient;
use crate::auth::{Credentials, TokenManager};
use crate::documents::DocumentsClient;
use crate::envelopes::EnvelopesClient;
use crate::error::{ESignError, Result};
use crate::recipients::RecipientsClient;
use crate::tags::TagsClient;

const DEFAULT_BASE_URL: &str = "https://api.esignatures.dev/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const BASE_URL_ENV: &str = "ESIGN_BASE_URL";
const TIMEOUT_ENV: &str = "ESIGN_TIMEOUT_SECS";

/// Content types returned as raw bytes instead of JSON.
const BINARY_CONTENT_TYPES: [&str; 2] = ["application/pdf", "application/zip"];

/// esign API client.
///
/// Cheap to clone; clones share the connection pool and the token cache.
///
/// # Example
///
/// ```rust,no_run
/// use esign::{Client, Credentials};
/// use esign::types::CreateEnvelopeRequest;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx"))?;
///
///     let envelope = client.envelopes().create(CreateEnvelopeRequest {
///         name: "NDA".to_string(),
///         ..Default::default()
///     }).await?;
///     println!("Created envelope {} ({:?})", envelope.id, envelope.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) http: HttpClient,
    pub(crate) base_url: String,
    tokens: Arc<TokenManager>,
}

/// Configuration options for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL for the API (default: https://api.esignatures.dev/v1).
    pub base_url: Option<String>,
    /// Request timeout (default: 30 seconds).
    pub timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Read optional overrides from `ESIGN_BASE_URL` and `ESIGN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).ok().filter(|s| !s.is_empty());
        let timeout = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ESignError::InvalidRequest(format!("{} must be a number of seconds", TIMEOUT_ENV))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };
        Ok(Self {
            base_url,
            timeout,
            user_agent: None,
        })
    }
}

/// Request payload accepted by [`Client::execute`].
#[derive(Debug)]
pub enum RequestBody {
    /// Serialized as JSON text with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Sent as-is; the transport sets the boundary-aware content type.
    Multipart(Form),
}

/// Normalized response of a single API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    /// PDF or ZIP payload.
    Binary {
        /// Content type reported by the service.
        content_type: String,
        /// Raw response bytes.
        bytes: Vec<u8>,
    },
    /// 204 No Content.
    Empty,
    /// Parsed JSON body.
    Json(serde_json::Value),
}

impl ApiResult {
    /// Decode a JSON result into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ApiResult::Json(value) => Ok(serde_json::from_value(value)?),
            ApiResult::Empty => Err(ESignError::UnexpectedResponse(
                "expected a JSON body, got no content".to_string(),
            )),
            ApiResult::Binary { content_type, .. } => Err(ESignError::UnexpectedResponse(
                format!("expected a JSON body, got {}", content_type),
            )),
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiResult::Binary { .. } => "binary",
            ApiResult::Empty => "empty",
            ApiResult::Json(_) => "json",
        }
    }
}

impl Client {
    /// Create a new client with default configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, Credentials};
    ///
    /// let client = Client::new(Credentials::new("ak_xxxxx", "sk_xxxxx")).unwrap();
    /// ```
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client from `ESIGN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(Credentials::from_env()?, ClientConfig::from_env()?)
    }

    /// Create a new client with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, ClientConfig, Credentials};
    /// use std::time::Duration;
    ///
    /// let client = Client::with_config(
    ///     Credentials::new("ak_xxxxx", "sk_xxxxx"),
    ///     ClientConfig {
    ///         base_url: Some("https://sandbox.esignatures.dev/v1".to_string()),
    ///         timeout: Some(Duration::from_secs(60)),
    ///         user_agent: Some("my-agent/1.0".to_string()),
    ///     },
    /// ).unwrap();
    /// ```
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let timeout = config
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let user_agent = config
            .user_agent
            .unwrap_or_else(|| format!("esign-rust/{}", env!("CARGO_PKG_VERSION")));

        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let tokens = Arc::new(TokenManager::new(http.clone(), &base_url, credentials));

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Envelope operations.
    pub fn envelopes(&self) -> EnvelopesClient {
        EnvelopesClient::new(self.clone())
    }

    /// File upload, document and download operations.
    pub fn documents(&self) -> DocumentsClient {
        DocumentsClient::new(self.clone())
    }

    /// Recipient operations.
    pub fn recipients(&self) -> RecipientsClient {
        RecipientsClient::new(self.clone())
    }

    /// Tag placement operations.
    pub fn tags(&self) -> TagsClient {
        TagsClient::new(self.clone())
    }

    /// Account operations.
    pub fn account(&self) -> AccountClient {
        AccountClient::new(self.clone())
    }

    /// Return a valid bearer token, exchanging credentials if needed.
    pub async fn token(&self) -> Result<String> {
        self.tokens.get_token().await
    }

    /// Forget the cached token so the next call exchanges credentials again.
    pub fn invalidate_token(&self) {
        self.tokens.invalidate();
    }

    /// Issue an authenticated request and normalize the response.
    ///
    /// Binary (PDF/ZIP) responses win over everything else, then 204, then
    /// JSON. Any non-2xx status that reaches the JSON branch is an
    /// [`ESignError::Api`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<ApiResult> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "sending request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        request = match body {
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            Some(RequestBody::Json(value)) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&value)?),
            None => request.header(header::CONTENT_TYPE, "application/json"),
        };

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        let result = normalize(status, content_type.as_deref(), &bytes)?;
        debug!(%method, path, status = status.as_u16(), kind = result.kind(), "received response");
        Ok(result)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<ApiResult> {
        self.execute(Method::GET, path, None).await
    }

    pub(crate) async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResult> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        self.execute(method, path, Some(body)).await
    }
}

/// Three-way response dispatch.
pub(crate) fn normalize(
    status: StatusCode,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ApiResult> {
    if let Some(ct) = content_type.filter(|ct| is_binary_content_type(ct)) {
        return Ok(ApiResult::Binary {
            content_type: ct.to_string(),
            bytes: bytes.to_vec(),
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(ApiResult::Empty);
    }

    let body = body_to_value(bytes);
    if !status.is_success() {
        return Err(ESignError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(ApiResult::Json(body))
}

fn is_binary_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    BINARY_CONTENT_TYPES.contains(&essence.as_str())
}

/// Parse a response body as JSON, falling back to the raw text.
pub(crate) fn body_to_value(bytes: &[u8]) -> serde_json::Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Append only the parameters that are present.
pub(crate) fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
        .collect();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> Client {
        Client::new(Credentials::new("ak", "sk")).unwrap()
    }

    #[test]
    fn test_client_new() {
        assert_eq!(client().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_with_config_trims_slash() {
        let client = Client::with_config(
            Credentials::new("ak", "sk"),
            ClientConfig {
                base_url: Some("https://custom.api.com/v2/".to_string()),
                timeout: Some(Duration::from_secs(60)),
                user_agent: None,
            },
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://custom.api.com/v2");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_pdf_is_binary_regardless_of_status() {
        let result = normalize(StatusCode::NOT_FOUND, Some("application/pdf"), b"%PDF-1.7").unwrap();
        assert_eq!(
            result,
            ApiResult::Binary {
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF-1.7".to_vec(),
            }
        );
    }

    #[test]
    fn test_zip_with_parameters_is_binary() {
        let result = normalize(StatusCode::OK, Some("Application/ZIP; charset=binary"), b"PK").unwrap();
        assert_eq!(result.kind(), "binary");
    }

    #[test]
    fn test_no_content_skips_json() {
        let result = normalize(StatusCode::NO_CONTENT, Some("application/json"), b"not json").unwrap();
        assert_eq!(result, ApiResult::Empty);
    }

    #[test]
    fn test_success_json() {
        let result = normalize(StatusCode::CREATED, Some("application/json"), br#"{"id":"x"}"#).unwrap();
        assert_eq!(result, ApiResult::Json(json!({"id": "x"})));
    }

    #[test]
    fn test_error_json_body_is_kept() {
        let err = normalize(
            StatusCode::UNPROCESSABLE_ENTITY,
            Some("application/json"),
            br#"{"message":"Envelope has no tags"}"#,
        )
        .unwrap_err();
        match err {
            ESignError::Api { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, json!({"message": "Envelope has no tags"}));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_raw_body_is_kept() {
        let err = normalize(StatusCode::BAD_GATEWAY, Some("text/html"), b"<h1>bad gateway</h1>").unwrap_err();
        assert_eq!(err.body(), Some(&json!("<h1>bad gateway</h1>")));
    }

    #[test]
    fn test_empty_success_body_is_null() {
        let result = normalize(StatusCode::OK, None, b"").unwrap();
        assert_eq!(result, ApiResult::Json(serde_json::Value::Null));
    }

    #[test]
    fn test_into_json_rejects_other_variants() {
        assert!(matches!(
            ApiResult::Empty.into_json::<serde_json::Value>(),
            Err(ESignError::UnexpectedResponse(_))
        ));
        let binary = ApiResult::Binary {
            content_type: "application/pdf".to_string(),
            bytes: vec![],
        };
        assert!(matches!(
            binary.into_json::<serde_json::Value>(),
            Err(ESignError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_with_query_omits_absent() {
        assert_eq!(with_query("/envelopes", &[("status", None), ("page", None)]), "/envelopes");
        assert_eq!(
            with_query("/envelopes", &[("status", Some("sent".to_string())), ("page", None)]),
            "/envelopes?status=sent"
        );
        assert_eq!(
            with_query(
                "/envelopes",
                &[("status", None), ("page", Some("2".to_string())), ("per_page", Some("10".to_string()))]
            ),
            "/envelopes?page=2&per_page=10"
        );
    }

    #[test]
    fn test_token_fetch_transport_error() {
        // Nothing listens on port 9; the exchange surfaces a transport error.
        let client = Client::with_config(
            Credentials::new("ak", "sk"),
            ClientConfig {
                base_url: Some("http://127.0.0.1:9".to_string()),
                timeout: Some(Duration::from_secs(2)),
                user_agent: None,
            },
        )
        .unwrap();
        let result = tokio_test::block_on(client.token());
        assert!(matches!(result, Err(ESignError::Http(_))));
    }
}

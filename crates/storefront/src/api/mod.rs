//! Storefront REST API client.
//!
//! Every screen talks to the backend through [`ApiClient`]. The client is a
//! thin wrapper: it builds requests, injects the bearer token when one is
//! present, and turns responses into typed values or an [`ApiError`].
//!
//! # Wire Conventions
//!
//! - Base URL ends in `/api`, e.g. `http://localhost:5000/api`
//! - JSON request and response bodies
//! - `Authorization: Bearer <token>` when the session has a token
//! - Responses carry `{ success, data, message? }`
//! - Any non-2xx status is a failure regardless of body shape; the error
//!   message is the body's `message`, or `HTTP error! status: <code>`

mod admin;
mod auth;
mod cart;
mod orders;
mod products;

pub use auth::LoginPayload;
pub use products::ProductQuery;

use std::sync::Arc;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message to show inline: the server's message when it sent one,
    /// otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Rejected(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status of a non-2xx response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Standard response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Require `success: true`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the server message (or `fallback`)
    /// when `success` is missing or false.
    pub fn require_success(self, fallback: &str) -> Result<Self, ApiError> {
        if self.success == Some(true) {
            Ok(self)
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }

    /// Reject only an explicit `success: false`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the backend reported failure.
    pub fn reject_failure(self, fallback: &str) -> Result<Self, ApiError> {
        if self.success == Some(false) {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        } else {
            Ok(self)
        }
    }

    /// Require `success: true` and a `data` payload.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` on failure, `ApiError::Parse` if `data`
    /// is missing.
    pub fn into_data(self, fallback: &str) -> Result<T, ApiError> {
        self.require_success(fallback)?
            .data
            .ok_or_else(|| ApiError::Parse("response has no data".to_string()))
    }
}

/// Storefront REST API client.
///
/// Cheap to clone. The bearer token is injected explicitly with
/// [`ApiClient::with_token`] rather than read from shared storage, so each
/// screen runs against exactly the session it was given.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<Arc<SecretString>>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client without a token.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            }),
            token: None,
        })
    }

    /// A copy of this client that sends `token` as a bearer credential.
    #[must_use]
    pub fn with_token(&self, token: Option<&SecretString>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: token.map(|t| Arc::new(SecretString::from(t.expose_secret().to_owned()))),
        }
    }

    /// Whether requests carry a bearer token.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, &[], None).await
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, query, None).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// Execute a DELETE request with query parameters.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::DELETE, path, query, None).await
    }

    #[instrument(skip(self, query, body), fields(method = %method, path = %path))]
    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut url = url::Url::parse(&format!("{}{path}", self.inner.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut request = self.inner.client.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request did not complete");
            ApiError::Request(e)
        })?;

        self.handle_response(response).await
    }

    /// Handle a response and parse its JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "Request succeeded");
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-2xx response into an error, preferring the server's message.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));

        warn!(status, message = %message, "Backend returned an error");
        ApiError::Status { status, message }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: "Product out of stock".to_string(),
        };
        assert_eq!(err.user_message("Failed"), "Product out of stock");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(
            ApiError::Rejected(String::new()).user_message("Failed to add to cart"),
            "Failed to add to cart"
        );
        assert_eq!(
            ApiError::Parse("bad".to_string()).user_message("Failed to load"),
            "Failed to load"
        );
    }

    #[test]
    fn test_envelope_require_success() {
        let ok: ApiResponse<u32> =
            serde_json::from_str(r#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(ok.into_data("x").unwrap(), 7);

        let missing: ApiResponse<u32> = serde_json::from_str(r#"{"data":7}"#).unwrap();
        assert!(matches!(
            missing.require_success("Failed to load users"),
            Err(ApiError::Rejected(m)) if m == "Failed to load users"
        ));

        let rejected: ApiResponse<u32> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert!(matches!(rejected.into_data("x"), Err(ApiError::Rejected(m)) if m == "nope"));
    }

    #[test]
    fn test_envelope_reject_failure_tolerates_missing_flag() {
        let bare: ApiResponse<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(bare.reject_failure("x").is_ok());
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let client = ApiClient::new(&ClientConfig::default())
            .unwrap()
            .with_token(Some(&SecretString::from("tok-123".to_string())));
        let debug = format!("{client:?}");
        assert!(!debug.contains("tok-123"));
        assert!(client.has_token());
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}

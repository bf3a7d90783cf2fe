//! Error types for the Bitcoin stats service

use thiserror::Error;

/// What went wrong while building or navigating a `JsonValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorKind {
    /// The raw value could not be classified as JSON
    Init,
    /// The raw bytes were not valid JSON
    Parse,
    /// A key or index lookup missed
    Keypath,
}

/// Payload of `JsonValue::Invalid`
///
/// Keypath errors carry the breadcrumb of every step taken since the first
/// failed lookup, joined with `/`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct JsonError {
    kind: JsonErrorKind,
    message: String,
    breadcrumb: Option<String>,
}

impl JsonError {
    /// Creates an Init error
    pub fn init() -> Self {
        Self {
            kind: JsonErrorKind::Init,
            message: "JSON Init Error: Invalid Value Passed In init()".to_string(),
            breadcrumb: None,
        }
    }

    /// Creates a Parse error
    pub fn parse() -> Self {
        Self {
            kind: JsonErrorKind::Parse,
            message: "JSON Parser Error: Invalid Raw JSON Data".to_string(),
            breadcrumb: None,
        }
    }

    /// Creates a Keypath error for the given breadcrumb
    pub fn keypath(breadcrumb: impl Into<String>) -> Self {
        let breadcrumb = breadcrumb.into();
        Self {
            kind: JsonErrorKind::Keypath,
            message: format!("JSON Keypath Error: Incorrect Keypath \"{breadcrumb}\""),
            breadcrumb: Some(breadcrumb),
        }
    }

    /// Returns a new error with `segment` appended to the breadcrumb, or
    /// `None` if this error has no breadcrumb to extend
    pub(crate) fn extend(&self, segment: &str) -> Option<Self> {
        self.breadcrumb
            .as_ref()
            .map(|breadcrumb| Self::keypath(format!("{breadcrumb}/{segment}")))
    }

    pub fn kind(&self) -> JsonErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn breadcrumb(&self) -> Option<&str> {
        self.breadcrumb.as_deref()
    }
}

/// Errors that can occur when fetching stats or price history
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Non-success HTTP status
    #[error("API error: {0}")]
    ApiError(String),

    /// Response body was not a JSON object
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response parsed but lacked an expected field
    #[error("Malformed response: missing or mistyped field `{field}`")]
    MalformedResponse { field: String },
}

impl ServiceError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedResponse {
            field: field.into(),
        }
    }
}

/// Errors raised while writing to the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Value could not be encoded
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

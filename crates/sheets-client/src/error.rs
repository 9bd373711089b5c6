//! Error taxonomy for Sheets API calls
//!
//! Every failure that crosses the client boundary is an `ApiError`: local
//! argument validation, broker/credential failures, non-2xx responses and
//! transport errors. The `ErrorKind` says which of those it was; the status
//! and raw payload are kept when the failure came from an HTTP response.

use serde_json::{Value, json};

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials could not be obtained, or the API rejected them twice
    Authentication,
    /// 403: authenticated but not permitted
    Authorization,
    /// 404
    ResourceNotFound,
    /// 429
    QuotaExceeded,
    /// Local argument check failed, or 400 from the API
    Validation,
    /// Anything else: 5xx, unexpected statuses, transport failures
    Api,
}

impl ErrorKind {
    /// Status code → kind. Statuses without a dedicated kind map to `Api`.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::ResourceNotFound,
            429 => ErrorKind::QuotaExceeded,
            _ => ErrorKind::Api,
        }
    }

    /// Stable name reported to tool callers.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "AuthenticationError",
            ErrorKind::Authorization => "AuthorizationError",
            ErrorKind::ResourceNotFound => "ResourceNotFoundError",
            ErrorKind::QuotaExceeded => "QuotaExceededError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Api => "APIError",
        }
    }
}

/// A classified, immutable failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    payload: Option<Value>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            payload: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// `<field> is required`
    pub fn required(field: &str) -> Self {
        Self::validation(format!("{field} is required"))
    }

    /// Classify an unsuccessful HTTP response.
    ///
    /// The detail is `error.message` from a JSON body, else the raw body
    /// text, else `HTTP <status> error`. The parsed body, when it is JSON,
    /// is kept as the payload.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload: Option<Value> = serde_json::from_str(body).ok();
        let detail = payload
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| (!body.is_empty()).then(|| body.to_string()))
            .unwrap_or_else(|| format!("HTTP {status} error"));

        let message = match status {
            400 => format!("Bad request: {detail}"),
            401 => format!("Authentication failed: {detail}"),
            403 => format!("Permission denied: {detail}"),
            404 => format!("Resource not found: {detail}"),
            429 => format!("Quota exceeded: {detail}"),
            500..=599 => format!("Server error: {detail}"),
            _ => format!("HTTP {status}: {detail}"),
        };

        Self {
            kind: ErrorKind::from_status(status),
            message,
            status: Some(status),
            payload,
        }
    }

    /// Classify a failure below HTTP (no response was received).
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timeout - Google Sheets API did not respond in time".to_string()
        } else if err.is_connect() {
            "Connection error - Unable to reach Google Sheets API".to_string()
        } else {
            format!("Request failed: {err}")
        };
        Self::new(ErrorKind::Api, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// `{"error": {"type", "message", "status_code", "details"}}`
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "type": self.kind.label(),
                "message": self.message,
                "status_code": self.status,
                "details": self.payload,
            }
        })
    }
}

impl From<nango_auth::Error> for ApiError {
    fn from(err: nango_auth::Error) -> Self {
        ApiError::authentication(err.to_string())
    }
}

/// Result alias for Sheets operations.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Error types for credential broker operations

/// Errors from obtaining credentials through the broker.
///
/// Every variant is an authentication failure from the caller's point of
/// view; the variants only differ in what went wrong on the way.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Timeout while connecting to Nango authentication service")]
    Timeout,

    #[error("Failed to connect to Nango authentication service")]
    Connect,

    #[error("Invalid Nango secret key")]
    InvalidSecretKey,

    #[error("Nango connection not found")]
    ConnectionNotFound,

    #[error("Nango API error: {status} - {body}")]
    Broker { status: u16, body: String },

    #[error("No access token found in Nango credentials")]
    MissingAccessToken,

    #[error("Unexpected error getting Nango credentials: {0}")]
    Unexpected(String),
}

impl Error {
    /// Map a reqwest transport failure onto the broker error variants.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Connect
        } else {
            Error::Unexpected(err.to_string())
        }
    }

    /// Short label for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Error::MissingConfig(_) => "missing_config",
            Error::Timeout => "timeout",
            Error::Connect => "connect",
            Error::InvalidSecretKey => "invalid_secret_key",
            Error::ConnectionNotFound => "connection_not_found",
            Error::Broker { .. } => "broker_error",
            Error::MissingAccessToken => "missing_access_token",
            Error::Unexpected(_) => "unexpected",
        }
    }
}

/// Result alias for broker operations.
pub type Result<T> = std::result::Result<T, Error>;

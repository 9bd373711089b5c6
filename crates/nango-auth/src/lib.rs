//! Nango credential broker client
//!
//! Obtains Google OAuth access tokens from a Nango connection instead of
//! running OAuth flows locally. Nango holds the upstream refresh token and
//! refreshes it on request (`refresh_token=true`); this crate only ever sees
//! the resulting short-lived access token.
//!
//! Credential flow:
//! 1. Process start builds a `ConnectionDescriptor` from configuration
//! 2. `BrokerClient::fetch_credentials()` validates the descriptor, then calls
//!    `GET {base_url}/connection/{connection_id}`
//! 3. `ConnectionResponse::access_token()` extracts `credentials.access_token`
//! 4. Callers cache the token behind the `CredentialSource` trait

pub mod broker;
pub mod connection;
pub mod constants;
pub mod error;
pub mod source;

pub use broker::{BrokerClient, ConnectionCredentials, ConnectionResponse};
pub use connection::ConnectionDescriptor;
pub use constants::*;
pub use error::{Error, Result};
pub use source::CredentialSource;

//! Access-token source abstraction
//!
//! Decouples token caching from how tokens are obtained. `BrokerClient` is
//! the production implementation; tests substitute counting fakes.

use std::future::Future;
use std::pin::Pin;

use common::Secret;
use tracing::info;

use crate::broker::BrokerClient;
use crate::error::Result;

/// Something that can produce a fresh bearer access token.
///
/// Uses `Pin<Box<dyn Future>>` return types so it can be held as
/// `Arc<dyn CredentialSource>`.
pub trait CredentialSource: Send + Sync {
    /// Identifier for logging (e.g. "nango")
    fn id(&self) -> &str;

    /// Obtain a new access token. Never served from a cache.
    fn fetch_access_token(&self) -> Pin<Box<dyn Future<Output = Result<Secret<String>>> + Send + '_>>;
}

impl CredentialSource for BrokerClient {
    fn id(&self) -> &str {
        "nango"
    }

    fn fetch_access_token(&self) -> Pin<Box<dyn Future<Output = Result<Secret<String>>> + Send + '_>> {
        Box::pin(async move {
            let response = self.fetch_credentials().await?;
            let token = response.access_token()?;
            info!(
                connection_id = %self.connection().connection_id,
                token_length = token.len(),
                "obtained access token from nango"
            );
            Ok(token)
        })
    }
}

//! Lock-guarded token slot
//!
//! A tokio `Mutex` guards the slot and is held across the fetch, so
//! concurrent callers that find the slot empty queue behind one fetch instead
//! of each calling the broker. Invalidation takes the same lock and can never
//! interleave with a store.

use std::sync::Arc;

use common::Secret;
use nango_auth::{CredentialSource, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Cache holding the last access token obtained from a `CredentialSource`.
///
/// Owned by whoever builds the executor; share it with `Arc` if more than one
/// component needs it.
pub struct TokenCache {
    source: Arc<dyn CredentialSource>,
    slot: Mutex<Option<Secret<String>>>,
}

impl TokenCache {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached token, fetching one if the slot is empty.
    pub async fn get_or_fetch(&self) -> Result<Secret<String>> {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        debug!(source = self.source.id(), "token cache empty, fetching");
        let token = self.source.fetch_access_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token. Calling this on an empty cache is a no-op.
    pub async fn invalidate(&self) {
        if self.slot.lock().await.take().is_some() {
            debug!(source = self.source.id(), "token cache invalidated");
        }
    }

    /// Replace the cached token with a freshly fetched one.
    ///
    /// `rejected` is the token the caller saw fail. If the slot already holds
    /// a different token, someone else refreshed in the meantime and that
    /// token is returned without another fetch. On failure the slot is left
    /// empty.
    pub async fn refresh(&self, rejected: Option<&Secret<String>>) -> Result<Secret<String>> {
        let mut slot = self.slot.lock().await;
        if let (Some(rejected), Some(current)) = (rejected, slot.as_ref())
            && current != rejected
        {
            debug!("token already refreshed by a concurrent caller");
            return Ok(current.clone());
        }

        *slot = None;
        match self.source.fetch_access_token().await {
            Ok(token) => {
                info!(source = self.source.id(), "access token refreshed");
                *slot = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                warn!(source = self.source.id(), error = %e, "access token refresh failed");
                Err(e)
            }
        }
    }

    /// Whether a token is currently held.
    pub async fn is_cached(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

//! Nango connection endpoint client
//!
//! One interaction: `GET {base_url}/connection/{connection_id}` with the
//! integration id as `provider_config_key` and `refresh_token=true`, so Nango
//! refreshes the upstream Google token before answering if it is stale.
//! Authenticated with the Nango secret key as a bearer token.

use std::time::Duration;

use common::Secret;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::connection::ConnectionDescriptor;
use crate::constants::BROKER_TIMEOUT;
use crate::error::{Error, Result};

/// Body returned by the connection endpoint.
///
/// Only `credentials.access_token` is typed. The other fields are kept as
/// raw JSON so a change in their shape never rejects a usable token.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionResponse {
    pub connection_id: Option<Value>,
    pub provider_config_key: Option<Value>,
    pub provider: Option<Value>,
    pub credentials: Option<ConnectionCredentials>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionCredentials {
    #[serde(rename = "type")]
    pub credential_type: Option<Value>,
    pub access_token: Option<String>,
    /// Informational; Nango has sent both timestamps and epoch seconds
    pub expires_at: Option<Value>,
}

impl ConnectionResponse {
    /// Extract the nested `credentials.access_token`.
    pub fn access_token(&self) -> Result<Secret<String>> {
        self.credentials
            .as_ref()
            .and_then(|c| c.access_token.as_deref())
            .filter(|token| !token.is_empty())
            .map(|token| Secret::new(token.to_string()))
            .ok_or(Error::MissingAccessToken)
    }
}

/// Client for a single configured Nango connection.
pub struct BrokerClient {
    http: reqwest::Client,
    connection: ConnectionDescriptor,
    timeout: Duration,
}

impl BrokerClient {
    pub fn new(http: reqwest::Client, connection: ConnectionDescriptor) -> Self {
        Self {
            http,
            connection,
            timeout: BROKER_TIMEOUT,
        }
    }

    /// Override the per-request timeout (tests use short values).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connection(&self) -> &ConnectionDescriptor {
        &self.connection
    }

    /// Fetch the connection's current credentials from Nango.
    ///
    /// Fails with `MissingConfig` before any network I/O when the descriptor
    /// is incomplete.
    pub async fn fetch_credentials(&self) -> Result<ConnectionResponse> {
        let result = self.request_credentials().await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.label(),
        };
        metrics::counter!("nango_credential_fetches_total", "outcome" => outcome).increment(1);
        result
    }

    async fn request_credentials(&self) -> Result<ConnectionResponse> {
        let missing = self.connection.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "nango connection is not fully configured");
            return Err(Error::MissingConfig(missing));
        }

        debug!(
            connection_id = %self.connection.connection_id,
            integration_id = %self.connection.integration_id,
            "requesting credentials from nango"
        );

        let response = self
            .http
            .get(self.connection.connection_url())
            .query(&[
                (
                    "provider_config_key",
                    self.connection.integration_id.as_str(),
                ),
                ("refresh_token", "true"),
            ])
            .bearer_auth(self.connection.secret_key.expose())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(match status.as_u16() {
                401 => Error::InvalidSecretKey,
                404 => Error::ConnectionNotFound,
                code => Error::Broker { status: code, body },
            });
        }

        response
            .json::<ConnectionResponse>()
            .await
            .map_err(|e| Error::Unexpected(format!("invalid connection response: {e}")))
    }
}

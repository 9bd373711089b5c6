//! Connection descriptor: which Nango connection to authenticate as
//!
//! Built once at process start and never mutated. Fields may be empty at
//! construction time; emptiness is reported by `missing_fields()` and only
//! enforced when credentials are actually requested, so a half-configured
//! server can still start and explain itself.

use common::Secret;

use crate::constants::{
    ENV_BASE_URL, ENV_CONNECTION_ID, ENV_INTEGRATION_ID, ENV_SECRET_KEY, REQUIRED_ENV_VARS,
};

/// Identity of the external account the broker manages for us.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub connection_id: String,
    /// Nango provider config key (e.g. `google-sheet`)
    pub integration_id: String,
    pub base_url: String,
    pub secret_key: Secret<String>,
}

impl ConnectionDescriptor {
    pub fn new(
        connection_id: impl Into<String>,
        integration_id: impl Into<String>,
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            integration_id: integration_id.into(),
            base_url: base_url.into(),
            secret_key: Secret::new(secret_key.into()),
        }
    }

    /// Read the descriptor from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the descriptor from an arbitrary key lookup. Absent keys become
    /// empty fields.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self::new(
            get(ENV_CONNECTION_ID),
            get(ENV_INTEGRATION_ID),
            get(ENV_BASE_URL),
            get(ENV_SECRET_KEY),
        )
    }

    /// Presence of each required setting, keyed by its environment name.
    pub fn presence(&self) -> [(&'static str, bool); 4] {
        let values = [
            self.connection_id.as_str(),
            self.integration_id.as_str(),
            self.base_url.as_str(),
            self.secret_key.expose().as_str(),
        ];
        let mut out = [("", false); 4];
        for (slot, (name, value)) in out.iter_mut().zip(REQUIRED_ENV_VARS.iter().zip(values)) {
            *slot = (*name, !value.trim().is_empty());
        }
        out
    }

    /// Names of the settings that are empty, in `REQUIRED_ENV_VARS` order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.presence()
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// `{base_url}/connection/{connection_id}`
    pub fn connection_url(&self) -> String {
        format!(
            "{}/connection/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.connection_id)
        )
    }
}

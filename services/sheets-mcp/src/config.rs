//! Configuration types and loading
//!
//! Precedence: env vars > config file > defaults. The file is optional; a
//! server configured purely through `NANGO_*` variables needs none. The Nango
//! secret key comes from `NANGO_SECRET_KEY` or `secret_key_file`, never from
//! the TOML itself.
//!
//! Missing Nango settings are not a load error: the server still starts and
//! reports them when credentials are first requested.

use std::path::{Path, PathBuf};
use std::time::Duration;

use common::Secret;
use nango_auth::{
    ConnectionDescriptor, ENV_BASE_URL, ENV_CONNECTION_ID, ENV_INTEGRATION_ID, ENV_SECRET_KEY,
};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
pub const ENV_API_BASE_URL: &str = "SHEETS_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SHEETS_TIMEOUT_SECS";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nango: NangoConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

/// Which Nango connection supplies the Google access token
#[derive(Debug, Default, Deserialize)]
pub struct NangoConfig {
    #[serde(default)]
    pub connection_id: String,
    #[serde(default)]
    pub integration_id: String,
    #[serde(default)]
    pub base_url: String,
    /// File holding the secret key (alternative to NANGO_SECRET_KEY)
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
    #[serde(skip)]
    pub secret_key: Option<Secret<String>>,
}

/// Google Sheets API settings
#[derive(Debug, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    sheets_client::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    sheets_client::DEFAULT_TIMEOUT.as_secs()
}

impl Config {
    /// Load from an optional TOML file, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> common::Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as `load`, reading variables through `env` instead of the process
    /// environment.
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> common::Result<Self> {
        let mut config: Config = match path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => Config::default(),
        };

        if let Some(v) = env(ENV_CONNECTION_ID) {
            config.nango.connection_id = v;
        }
        if let Some(v) = env(ENV_INTEGRATION_ID) {
            config.nango.integration_id = v;
        }
        if let Some(v) = env(ENV_BASE_URL) {
            config.nango.base_url = v;
        }
        if let Some(v) = env(ENV_API_BASE_URL) {
            config.sheets.api_base_url = v;
        }
        if let Some(v) = env(ENV_TIMEOUT_SECS) {
            config.sheets.timeout_secs = v.trim().parse().map_err(|e| common::Error::Env {
                var: ENV_TIMEOUT_SECS.to_string(),
                reason: format!("{e}"),
            })?;
        }

        // Secret key: env var takes precedence over file
        if let Some(key) = env(ENV_SECRET_KEY) {
            config.nango.secret_key = Some(Secret::new(key));
        } else if let Some(ref key_file) = config.nango.secret_key_file {
            let key = std::fs::read_to_string(key_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read secret_key_file {}: {e}",
                    key_file.display()
                ))
            })?;
            let key = key.trim().to_owned();
            if !key.is_empty() {
                config.nango.secret_key = Some(Secret::new(key));
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        let url = &self.sheets.api_base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "api_base_url must start with http:// or https://, got: {url}"
            )));
        }
        if self.sheets.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Config file path from the CLI flag, then CONFIG_PATH. None means
    /// run without a file.
    pub fn resolve_path(
        cli_path: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<PathBuf> {
        cli_path
            .map(str::to_string)
            .or_else(|| env(ENV_CONFIG_PATH))
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn connection(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(
            self.nango.connection_id.clone(),
            self.nango.integration_id.clone(),
            self.nango.base_url.clone(),
            self.nango
                .secret_key
                .as_ref()
                .map(|s| s.expose().clone())
                .unwrap_or_default(),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sheets.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = Config::load_with(None, no_env()).unwrap();
        assert_eq!(config.sheets.api_base_url, "https://sheets.googleapis.com");
        assert_eq!(config.sheets.timeout_secs, 30);
        assert!(config.nango.secret_key.is_none());
        assert_eq!(
            config.connection().missing_fields(),
            vec![
                ENV_CONNECTION_ID,
                ENV_INTEGRATION_ID,
                ENV_BASE_URL,
                ENV_SECRET_KEY
            ]
        );
    }

    #[test]
    fn env_only_configuration_is_complete() {
        let config = Config::load_with(
            None,
            env_from(&[
                (ENV_CONNECTION_ID, "conn-1"),
                (ENV_INTEGRATION_ID, "google-sheet"),
                (ENV_BASE_URL, "https://api.nango.dev"),
                (ENV_SECRET_KEY, "sk-env"),
            ]),
        )
        .unwrap();

        let connection = config.connection();
        assert!(connection.is_complete());
        assert_eq!(connection.secret_key.expose(), "sk-env");
    }

    #[test]
    fn file_values_are_loaded_and_env_overrides_them() {
        let file = toml_file(
            r#"
[nango]
connection_id = "from-file"
integration_id = "google-sheet"
base_url = "https://nango.internal"

[sheets]
timeout_secs = 10
"#,
        );

        let config = Config::load_with(
            Some(file.path()),
            env_from(&[(ENV_CONNECTION_ID, "from-env")]),
        )
        .unwrap();

        assert_eq!(config.nango.connection_id, "from-env");
        assert_eq!(config.nango.base_url, "https://nango.internal");
        assert_eq!(config.sheets.timeout_secs, 10);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.sheets.api_base_url, "https://sheets.googleapis.com");
    }

    #[test]
    fn secret_key_read_from_file_and_trimmed() {
        let key_file = toml_file("sk-from-file\n");
        let config_file = toml_file(&format!(
            "[nango]\nsecret_key_file = \"{}\"\n",
            key_file.path().display()
        ));

        let config = Config::load_with(Some(config_file.path()), no_env()).unwrap();
        assert_eq!(
            config.nango.secret_key.as_ref().unwrap().expose(),
            "sk-from-file"
        );
    }

    #[test]
    fn secret_key_env_overrides_file() {
        let key_file = toml_file("sk-from-file");
        let config_file = toml_file(&format!(
            "[nango]\nsecret_key_file = \"{}\"\n",
            key_file.path().display()
        ));

        let config =
            Config::load_with(Some(config_file.path()), env_from(&[(ENV_SECRET_KEY, "sk-env")]))
                .unwrap();
        assert_eq!(config.nango.secret_key.as_ref().unwrap().expose(), "sk-env");
    }

    #[test]
    fn unreadable_secret_key_file_is_config_error() {
        let config_file = toml_file("[nango]\nsecret_key_file = \"/nonexistent/nango-key\"\n");
        let err = Config::load_with(Some(config_file.path()), no_env()).unwrap_err();
        assert!(matches!(err, common::Error::Config(_)), "got {err:?}");
        assert!(err.to_string().contains("secret_key_file"));
    }

    #[test]
    fn invalid_timeout_env_is_rejected() {
        let err = Config::load_with(None, env_from(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        match err {
            common::Error::Env { var, .. } => assert_eq!(var, ENV_TIMEOUT_SECS),
            other => panic!("expected Env error, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::load_with(None, env_from(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be greater than 0"));
    }

    #[test]
    fn non_http_api_base_url_is_rejected() {
        let file = toml_file("[sheets]\napi_base_url = \"ftp://example.com\"\n");
        let err = Config::load_with(Some(file.path()), no_env()).unwrap_err();
        assert!(err.to_string().contains("api_base_url must start with http"));
    }

    #[test]
    fn missing_file_and_bad_toml_are_errors() {
        assert!(matches!(
            Config::load_with(Some(Path::new("/nonexistent/sheets.toml")), no_env()),
            Err(common::Error::Io(_))
        ));

        let file = toml_file("not valid {{{{ toml");
        assert!(matches!(
            Config::load_with(Some(file.path()), no_env()),
            Err(common::Error::Toml(_))
        ));
    }

    #[test]
    fn resolve_path_prefers_cli_then_env() {
        let env = env_from(&[(ENV_CONFIG_PATH, "/etc/sheets-mcp.toml")]);
        assert_eq!(
            Config::resolve_path(Some("/tmp/cli.toml"), &env),
            Some(PathBuf::from("/tmp/cli.toml"))
        );
        assert_eq!(
            Config::resolve_path(None, &env),
            Some(PathBuf::from("/etc/sheets-mcp.toml"))
        );
        assert_eq!(Config::resolve_path(None, no_env()), None);
    }
}

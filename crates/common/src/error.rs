//! Configuration error types shared by the workspace

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("invalid value for {var}: {reason}")]
    Env { var: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let config_err = Error::Config("api_base_url must be http(s)".into());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: api_base_url must be http(s)"
        );

        let env_err = Error::Env {
            var: "SHEETS_TIMEOUT_SECS".into(),
            reason: "not a number".into(),
        };
        assert_eq!(
            env_err.to_string(),
            "invalid value for SHEETS_TIMEOUT_SECS: not a number"
        );
    }

    #[test]
    fn io_error_converts() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("I/O error:"), "got: {err}");
    }
}

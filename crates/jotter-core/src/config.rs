//! Configuration module
//!
//! Client configuration is read from the environment. `JOTTER_API_URL`
//! points at the note service, `JOTTER_TOKEN_FILE` overrides where the
//! bearer token is persisted, and `JOTTER_HTTP_TIMEOUT_SECS` bounds API
//! round trips.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const TOKEN_FILE_NAME: &str = ".jotter/token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Client configuration shared by the CLI and embedders.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the note service, without a trailing slash.
    pub api_url: String,
    /// Where the bearer token is persisted between runs. `None` keeps the
    /// token in memory only.
    pub token_file: Option<PathBuf>,
    /// Timeout applied to API requests (not to object uploads).
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("JOTTER_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // An explicitly empty JOTTER_TOKEN_FILE disables persistence.
        let token_file = match lookup("JOTTER_TOKEN_FILE") {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => lookup("HOME").map(|home| PathBuf::from(home).join(TOKEN_FILE_NAME)),
        };

        let http_timeout = match lookup("JOTTER_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    var: "JOTTER_HTTP_TIMEOUT_SECS",
                    value: raw,
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            token_file,
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |var| map.get(var).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(config.token_file.is_none());
    }

    #[test]
    fn api_url_trailing_slash_trimmed() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("JOTTER_API_URL", "https://api.example.com/")]))
                .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn token_file_defaults_under_home() {
        let config = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/me")])).unwrap();
        assert_eq!(
            config.token_file,
            Some(PathBuf::from("/home/me/.jotter/token"))
        );
    }

    #[test]
    fn empty_token_file_disables_persistence() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("HOME", "/home/me"),
            ("JOTTER_TOKEN_FILE", ""),
        ]))
        .unwrap();
        assert!(config.token_file.is_none());
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[(
            "JOTTER_HTTP_TIMEOUT_SECS",
            "not-a-number",
        )]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "JOTTER_HTTP_TIMEOUT_SECS",
                ..
            }
        ));
    }
}

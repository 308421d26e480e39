//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const ENV_URL: &str = "COCKPIT_API_URL";
pub const ENV_TOKEN: &str = "COCKPIT_API_TOKEN";
pub const ENV_TIMEOUT: &str = "COCKPIT_API_TIMEOUT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for a `CockpitClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base endpoint, e.g. `https://example.tld/api/`.
    pub base_url: String,
    /// Static server-side API token, sent as the `api-key` header.
    pub token: String,
    /// Timeout for the whole exchange, enforced by the transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `COCKPIT_API_URL`, `COCKPIT_API_TOKEN` and the optional
    /// `COCKPIT_API_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let base_url = lookup(ENV_URL).ok_or(Error::MissingConfig(ENV_URL))?;
        let token = lookup(ENV_TOKEN).ok_or(Error::MissingConfig(ENV_TOKEN))?;
        let timeout_secs = match lookup(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidArgument(format!("{ENV_TIMEOUT} must be a number of seconds, got '{raw}'")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url,
            token,
            timeout_secs,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn new_uses_default_timeout() {
        let config = ClientConfig::new("https://cms.example/api", "token");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://cms.example/api"),
            (ENV_TOKEN, "secret"),
            (ENV_TIMEOUT, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://cms.example/api");
        assert_eq!(config.token, "secret");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn missing_url_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TOKEN, "secret")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ENV_URL)));
    }

    #[test]
    fn missing_token_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_URL, "https://cms.example/api")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ENV_TOKEN)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "https://cms.example/api"),
            (ENV_TOKEN, "secret"),
            (ENV_TIMEOUT, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn deserializes_with_default_timeout() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://cms.example/api","token":"secret"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("https://cms.example/api", "secret"));
    }
}

//! Relay configuration loaded from the process environment.

use std::{env, net::SocketAddr, time::Duration};

use crate::error::{RelayError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 4500;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct RelayConfig {
    /// Upstream credential. The relay starts without it and reports the gap per request.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub bind: SocketAddr,
    /// Minimum spacing between outbound calls; zero disables throttling.
    pub min_interval: Duration,
    pub upstream_timeout: Duration,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("bind", &self.bind)
            .field("min_interval", &self.min_interval)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl RelayConfig {
    /// Reads `.env` (if present) and then the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_raw = non_empty("YATRA_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse::<SocketAddr>().map_err(|err| {
            RelayError::Config(format!("YATRA_BIND `{bind_raw}` is not a socket address: {err}"))
        })?;

        let min_interval_ms = parse_u64(
            "YATRA_MIN_INTERVAL_MS",
            non_empty("YATRA_MIN_INTERVAL_MS"),
            DEFAULT_MIN_INTERVAL_MS,
        )?;
        let timeout_secs = parse_u64(
            "YATRA_UPSTREAM_TIMEOUT_SECS",
            non_empty("YATRA_UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(RelayError::Config(
                "YATRA_UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_key: non_empty("GEMINI_API_KEY"),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind,
            min_interval: Duration::from_millis(min_interval_ms),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}

fn parse_u64(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<u64>().map_err(|err| {
            RelayError::Config(format!("{key} `{value}` is not a whole number: {err}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.min_interval, Duration::from_millis(4500));
        assert_eq!(config.upstream_timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_read() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("YATRA_BIND", "0.0.0.0:9000"),
            ("YATRA_MIN_INTERVAL_MS", "0"),
            ("YATRA_UPSTREAM_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.bind.port(), 9000);
        assert!(config.min_interval.is_zero());
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = RelayConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn malformed_numbers_are_config_errors() {
        let err = RelayConfig::from_lookup(lookup(&[("YATRA_MIN_INTERVAL_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));

        let err = RelayConfig::from_lookup(lookup(&[("YATRA_UPSTREAM_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = RelayConfig::default().with_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

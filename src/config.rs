//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

use crate::domain::router::DEFAULT_FALLBACK_USERNAME;
use crate::error::RelayError;

/// Default bind address for the HTTP/WebSocket server.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5003";

/// Default per-connection outbound queue size.
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5003`).
    pub listen_addr: SocketAddr,

    /// Capacity of each connection's outbound queue.
    pub outbound_queue_capacity: usize,

    /// Display name attributed to senders that never registered.
    pub fallback_username: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` cannot be
    /// parsed as a [`SocketAddr`] or `OUTBOUND_QUEUE_CAPACITY` is zero.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = raw_addr.parse().map_err(|_| {
            RelayError::InvalidConfig(format!("LISTEN_ADDR is not a socket address: {raw_addr}"))
        })?;

        let outbound_queue_capacity = parse_value(
            lookup("OUTBOUND_QUEUE_CAPACITY"),
            DEFAULT_OUTBOUND_QUEUE_CAPACITY,
        );
        if outbound_queue_capacity == 0 {
            return Err(RelayError::InvalidConfig(
                "OUTBOUND_QUEUE_CAPACITY must be at least 1".to_string(),
            ));
        }

        let fallback_username = lookup("FALLBACK_USERNAME")
            .unwrap_or_else(|| DEFAULT_FALLBACK_USERNAME.to_string());

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            outbound_queue_capacity,
            fallback_username,
            log_format,
        })
    }
}

/// Parses `raw` as `T`, returning `default` on missing or invalid values.
fn parse_value<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<RelayConfig, RelayError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RelayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };
        assert_eq!(config.listen_addr.port(), 5003);
        assert_eq!(config.outbound_queue_capacity, DEFAULT_OUTBOUND_QUEUE_CAPACITY);
        assert_eq!(config.fallback_username, "unknown");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn overrides_are_read() {
        let Ok(config) = load(&[
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("OUTBOUND_QUEUE_CAPACITY", "8"),
            ("FALLBACK_USERNAME", "inconnu"),
            ("LOG_FORMAT", "json"),
        ]) else {
            panic!("overrides should load");
        };
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.outbound_queue_capacity, 8);
        assert_eq!(config.fallback_username, "inconnu");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let result = load(&[("LISTEN_ADDR", "not-an-addr")]);
        assert!(matches!(result, Err(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = load(&[("OUTBOUND_QUEUE_CAPACITY", "0")]);
        assert!(matches!(result, Err(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn garbage_capacity_falls_back() {
        let Ok(config) = load(&[("OUTBOUND_QUEUE_CAPACITY", "lots")]) else {
            panic!("invalid numbers fall back to defaults");
        };
        assert_eq!(config.outbound_queue_capacity, DEFAULT_OUTBOUND_QUEUE_CAPACITY);
    }
}

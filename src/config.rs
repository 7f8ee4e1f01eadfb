//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Parsing goes through a lookup closure so tests can feed a fixed map
//! instead of mutating the process environment. `from_env` is the thin
//! production wrapper. Malformed numbers are errors rather than silent
//! fallbacks; absent variables take the defaults below.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5004;
pub const DEFAULT_MOCK_GRAPH_DELAY_MS: u64 = 800;
pub const DEFAULT_MOCK_ADD_NODE_DELAY_MS: u64 = 500;
pub const DEFAULT_MOCK_FLIGHT_DELAY_MS: u64 = 500;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Simulated latency of the bundled mock data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    pub graph_fetch: Duration,
    pub add_node: Duration,
    pub flight_search: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Base URL of a real mind-map backend. Mock source when `None`.
    pub mindmap_api_url: Option<String>,
    /// Base URL of a real flight backend. Mock source when `None`.
    pub flight_api_url: Option<String>,
    /// Bearer token sent to the flight backend, which requires auth.
    pub flight_api_token: Option<String>,
    pub mock_delays: MockDelays,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 5004
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `MINDMAP_API_URL`, `FLIGHT_API_URL`: upstream base URLs
    /// - `FLIGHT_API_TOKEN`: bearer token for the flight backend
    /// - `MOCK_GRAPH_DELAY_MS`, `MOCK_ADD_NODE_DELAY_MS`, `MOCK_FLIGHT_DELAY_MS`
    /// - `UPSTREAM_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let bind_addr = parse_or(&lookup, "BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;

        let mock_delays = MockDelays {
            graph_fetch: Duration::from_millis(parse_or(&lookup, "MOCK_GRAPH_DELAY_MS", DEFAULT_MOCK_GRAPH_DELAY_MS)?),
            add_node: Duration::from_millis(parse_or(
                &lookup,
                "MOCK_ADD_NODE_DELAY_MS",
                DEFAULT_MOCK_ADD_NODE_DELAY_MS,
            )?),
            flight_search: Duration::from_millis(parse_or(
                &lookup,
                "MOCK_FLIGHT_DELAY_MS",
                DEFAULT_MOCK_FLIGHT_DELAY_MS,
            )?),
        };
        let upstream_timeout =
            Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?);

        Ok(Self {
            bind_addr,
            port,
            mindmap_api_url: base_url(&lookup, "MINDMAP_API_URL"),
            flight_api_url: base_url(&lookup, "FLIGHT_API_URL"),
            flight_api_token: non_blank(&lookup, "FLIGHT_API_TOKEN"),
            mock_delays,
            upstream_timeout,
        })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    let raw = lookup(var)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

fn base_url(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    let raw = lookup(var)?;
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

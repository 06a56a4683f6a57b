use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_HOST: &str = "api";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_LISTEN_PORT: u16 = 5000;

/// Runtime settings for the service, read from the environment.
///
/// | Variable                | Default |
/// |-------------------------|---------|
/// | `API_HOST`              | `api`   |
/// | `API_PORT`              | `8080`  |
/// | `UPSTREAM_TIMEOUT_SECS` | `10`    |
/// | `PROCESSING_DELAY_MS`   | `100`   |
/// | `SERVICE_ADDR`          | `0.0.0.0:5000` |
///
/// Missing or malformed values fall back to their defaults; loading never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_host: String,
    pub api_port: u16,
    pub upstream_timeout: Duration,
    pub processing_delay: Duration,
    /// Where `serve` mode listens.
    pub listen_addr: SocketAddr
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_LISTEN_PORT))
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_host = lookup("API_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or(defaults.api_host);

        Self {
            api_host,
            api_port: parse_or(&lookup, "API_PORT", defaults.api_port),
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout.as_secs())),
            processing_delay: Duration::from_millis(parse_or(&lookup, "PROCESSING_DELAY_MS", defaults.processing_delay.as_millis() as u64)),
            listen_addr: parse_or(&lookup, "SERVICE_ADDR", defaults.listen_addr)
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Invalid value '{raw}' for {key}, defaulting to {default}");
            default
        }
    }
}

//! Process-wide configuration, resolved once at start-up from the environment.
//!
//! The core never reads an environment variable itself (see the scheduler-core
//! crate's design notes on global state); everything here is read exactly
//! once in [`main`](crate::main) and passed down as ordinary arguments.

use std::env;
use std::net::SocketAddr;

/// CORS origin policy: either permissive (`*`, credentials disabled) or a
/// fixed allow-list (credentials enabled), mirroring the two modes the
/// distilled source's `CORS_ORIGINS` variable supports.
#[derive(Debug, Clone)]
pub enum CorsPolicy {
    Any,
    Origins(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub default_time_limit_seconds: u64,
    pub cors: CorsPolicy,
}

impl Config {
    /// Reads `BIND_ADDR`, `DEFAULT_TIME_LIMIT_SECONDS`, and `CORS_ORIGINS`
    /// from the environment, falling back to sane defaults for any that are
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let default_time_limit_seconds = env::var("DEFAULT_TIME_LIMIT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(scheduler_core::types::DEFAULT_TIME_LIMIT_SECONDS);

        let cors = match env::var("CORS_ORIGINS") {
            Ok(raw) => parse_cors_origins(&raw),
            Err(_) => CorsPolicy::Any,
        };

        Self {
            bind_addr,
            default_time_limit_seconds,
            cors,
        }
    }
}

/// `"*"` or empty is permissive; anything else is a comma-separated allow-list.
fn parse_cors_origins(raw: &str) -> CorsPolicy {
    if raw.trim() == "*" || raw.trim().is_empty() {
        CorsPolicy::Any
    } else {
        CorsPolicy::Origins(raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_or_empty_cors_origins_is_permissive() {
        assert!(matches!(parse_cors_origins(""), CorsPolicy::Any));
        assert!(matches!(parse_cors_origins("*"), CorsPolicy::Any));
    }

    #[test]
    fn comma_separated_cors_origins_is_a_fixed_list() {
        match parse_cors_origins("https://a.example, https://b.example") {
            CorsPolicy::Origins(origins) => {
                assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
            }
            CorsPolicy::Any => panic!("expected a fixed origin list"),
        }
    }
}

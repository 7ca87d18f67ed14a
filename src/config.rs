use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All values come from env vars (the .env file is loaded automatically at
/// startup via dotenvy). Every setting has a sensible default so `driftnet
/// init` works out of the box.
pub struct Config {
    pub db_path: String,
    /// Ceiling on the number of actors a single recompute may pair.
    /// The pairing phase is O(n²), so an unbounded actor list would
    /// silently turn a batch job into a runaway one.
    pub max_actors: usize,
    /// Per-call deadline for recompute, in seconds.
    pub deadline_secs: u64,
    /// How many suspect-set queries run concurrently during recompute.
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("DRIFTNET_DB_PATH").unwrap_or_else(|_| "./driftnet.db".to_string()),
            max_actors: parse_env("DRIFTNET_MAX_ACTORS", 500),
            deadline_secs: parse_env("DRIFTNET_DEADLINE_SECS", 300),
            concurrency: parse_env("DRIFTNET_CONCURRENCY", 8),
        })
    }
}

/// Parse a numeric env var, falling back to the default when unset or invalid.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Scoped to keys no other test touches
        std::env::remove_var("DRIFTNET_MAX_ACTORS");
        let config = Config::load().unwrap();
        assert_eq!(config.max_actors, 500);
        assert_eq!(config.deadline_secs, 300);
        assert_eq!(config.concurrency, 8);
    }

    #[test]
    fn test_parse_env_ignores_garbage() {
        std::env::set_var("DRIFTNET_TEST_GARBAGE", "not-a-number");
        let v: usize = parse_env("DRIFTNET_TEST_GARBAGE", 42);
        assert_eq!(v, 42);
        std::env::remove_var("DRIFTNET_TEST_GARBAGE");
    }
}

//! Service configuration
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! `main` via dotenvy):
//!
//! | Variable | Default | |
//! |---|---|---|
//! | DATABASE_URL | (required) | Postgres connection string |
//! | HOST | 0.0.0.0 | bind address |
//! | PORT | 8080 | HTTP port |
//! | DATABASE_MAX_CONNECTIONS | 5 | pool size |
//! | RULE_CACHE_TTL_SECS | 300 | pricing rule cache TTL |
//! | CACHE_WARM_INTERVAL_SECS | 600 | cache warmer period |

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub rule_cache_ttl: Duration,
    pub cache_warm_interval: Duration,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 8080)?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            rule_cache_ttl: Duration::from_secs(parse_or(&lookup, "RULE_CACHE_TTL_SECS", 300)?),
            cache_warm_interval: Duration::from_secs(parse_or(
                &lookup,
                "CACHE_WARM_INTERVAL_SECS",
                600,
            )?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/venue")]))
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.rule_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_warm_interval, Duration::from_secs(600));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/venue"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("RULE_CACHE_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.rule_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/venue"),
            ("PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::core::id_generator::MAX_SHARDS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub ids: IdConfig,
    pub threads: ThreadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    pub shard_id: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadConfig {
    /// Largest comment thread served in one response
    pub max_comments: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/sharedplay.db".to_string(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            cache: CacheConfig { capacity: 1000 },
            ids: IdConfig { shard_id: 0 },
            threads: ThreadConfig { max_comments: 10_000 },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server.port),
            },
            cache: CacheConfig {
                capacity: parse_var(&lookup, "CACHE_CAPACITY").unwrap_or(defaults.cache.capacity),
            },
            ids: IdConfig {
                shard_id: parse_var(&lookup, "SHARD_ID").unwrap_or(defaults.ids.shard_id),
            },
            threads: ThreadConfig {
                max_comments: parse_var(&lookup, "MAX_THREAD_COMMENTS")
                    .unwrap_or(defaults.threads.max_comments),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.ids.shard_id < MAX_SHARDS,
            "SHARD_ID must be less than {}, got {}",
            MAX_SHARDS,
            self.ids.shard_id
        );
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| value.trim().parse().ok())
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
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:8000");
        assert_eq!(config.database.url, "sqlite:data/sharedplay.db");
        assert_eq!(config.threads.max_comments, 10_000);
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_PORT", "9100"),
            ("SERVER_HOST", "127.0.0.1"),
            ("CACHE_CAPACITY", "lots"),
            ("MAX_THREAD_COMMENTS", "25"),
            ("SHARD_ID", "3"),
        ]))
        .unwrap();

        assert_eq!(config.server_address(), "127.0.0.1:9100");
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.threads.max_comments, 25);
        assert_eq!(config.ids.shard_id, 3);
    }

    #[test]
    fn test_out_of_range_shard_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("SHARD_ID", "4096")])).is_err());
        // Not a u16 at all: falls back to the default port
        let config = Config::from_lookup(lookup(&[("SERVER_PORT", "70000")])).unwrap();
        assert_eq!(config.server.port, 8000);
    }
}

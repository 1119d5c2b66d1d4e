//! Process configuration read from environment variables.

use std::str::FromStr;

use crate::infrastructure::ports::LinkMode;

const DEFAULT_DATABASE_URL: &str = "sqlite:filmhub.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Which storage adapter backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(format!("expected 'memory' or 'sqlite', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: String,
    pub friend_links: LinkMode,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            friend_links: LinkMode::default(),
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Reads `FILMHUB_STORAGE`, `DATABASE_URL`, `FRIEND_LINK_MODE`,
    /// `SERVER_HOST` and `SERVER_PORT` (or `PORT`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or empty variables fall back to defaults; malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let storage = match get("FILMHUB_STORAGE") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid("FILMHUB_STORAGE", &raw, reason))?,
            None => defaults.storage,
        };

        let friend_links = match get("FRIEND_LINK_MODE") {
            Some(raw) => raw
                .parse::<LinkMode>()
                .map_err(|e| ConfigError::invalid("FRIEND_LINK_MODE", &raw, e))?,
            None => defaults.friend_links,
        };

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", &raw, e))?,
            None => defaults.server_port,
        };

        Ok(Self {
            storage,
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            friend_links,
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("FILMHUB_STORAGE", "SQLite"),
            ("DATABASE_URL", "sqlite:/tmp/films.db"),
            ("FRIEND_LINK_MODE", "mutual"),
            ("SERVER_HOST", "127.0.0.1"),
            ("PORT", "9000"),
        ]))
        .expect("config");

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_url, "sqlite:/tmp/films.db");
        assert_eq!(config.friend_links, LinkMode::Mutual);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn server_port_wins_over_port() {
        let config =
            AppConfig::from_lookup(lookup(&[("SERVER_PORT", "7000"), ("PORT", "9000")]))
                .expect("config");
        assert_eq!(config.server_port, 7000);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("FILMHUB_STORAGE", "postgres")]))
            .expect_err("unknown backend");
        assert!(matches!(err, ConfigError::Invalid { key: "FILMHUB_STORAGE", .. }));

        let err = AppConfig::from_lookup(lookup(&[("SERVER_PORT", "http")]))
            .expect_err("bad port");
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_PORT", .. }));

        let err = AppConfig::from_lookup(lookup(&[("FRIEND_LINK_MODE", "sideways")]))
            .expect_err("bad link mode");
        assert!(matches!(err, ConfigError::Invalid { key: "FRIEND_LINK_MODE", .. }));
    }
}

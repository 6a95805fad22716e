use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings read from the environment (and `.env`, loaded by `main`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", "port number", 8080)?;
        let db_pool_size = parse_or(&lookup, "DB_POOL_SIZE", "pool size", 10)?;
        let run_migrations = parse_or(&lookup, "RUN_MIGRATIONS", "boolean", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            db_pool_size,
            run_migrations,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config,
            AppConfig {
                database_url: None,
                host: "0.0.0.0".to_string(),
                port: 8080,
                db_pool_size: 10,
                run_migrations: true,
            }
        );
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://shop@db/shop"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DB_POOL_SIZE", "3"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://shop@db/shop"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.db_pool_size, 3);
        assert!(!config.run_migrations);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn invalid_port_is_reported_by_name() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "PORT must be a valid port number, got 'eighty'"
        );
    }
}

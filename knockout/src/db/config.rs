//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable not set
    #[error("Missing required environment variable {var}: {hint}")]
    MissingRequired { var: String, hint: String },

    /// Variable set but unusable
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 5)
    /// - `DB_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 10)
    /// - `DB_IDLE_TIMEOUT`: Idle timeout in seconds (default: 600)
    /// - `DB_MAX_LIFETIME`: Max lifetime in seconds (default: 1800)
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not set or a pool variable does
    /// not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_url(None)
    }

    /// Same as [`DatabaseConfig::from_env`], but an explicit URL takes
    /// precedence over `DATABASE_URL`
    pub fn from_env_with_url(database_url: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(database_url, |var| env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable source
    fn from_lookup<F>(database_url: Option<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match database_url.or_else(|| lookup("DATABASE_URL")) {
            Some(url) => url,
            None => {
                return Err(ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "e.g. postgres://knockout@localhost/knockout".to_string(),
                });
            }
        };

        let config = Self {
            database_url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            connection_timeout_secs: parse_or(&lookup, "DB_CONNECTION_TIMEOUT", 10)?,
            idle_timeout_secs: parse_or(&lookup, "DB_IDLE_TIMEOUT", 600)?,
            max_lifetime_secs: parse_or(&lookup, "DB_MAX_LIFETIME", 1800)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/knockout` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/knockout".to_string(),
            max_connections: 20,
            min_connections: 5,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }

    /// Check pool bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Must not exceed DB_MAX_CONNECTIONS ({})",
                    self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_or<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_development_defaults_are_valid() {
        let config = DatabaseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_connections, 20);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_explicit_url_wins() {
        let lookup = vars(&[("DATABASE_URL", "postgres://ambient/db")]);
        let config =
            DatabaseConfig::from_lookup(Some("postgres://override/db".to_string()), lookup)
                .unwrap();
        assert_eq!(config.database_url, "postgres://override/db");
        assert_eq!(config.max_connections, 20);
    }

    #[test]
    fn test_pool_variables_are_read() {
        let lookup = vars(&[
            ("DATABASE_URL", "postgres://ambient/db"),
            ("DB_MAX_CONNECTIONS", " 8 "),
            ("DB_MIN_CONNECTIONS", "2"),
        ]);
        let config = DatabaseConfig::from_lookup(None, lookup).unwrap();
        assert_eq!(config.database_url, "postgres://ambient/db");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.idle_timeout_secs, 600);
    }

    #[test]
    fn test_missing_url_and_bad_number() {
        let err = DatabaseConfig::from_lookup(None, vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { var, .. } if var == "DATABASE_URL"));

        let lookup = vars(&[("DB_MAX_CONNECTIONS", "lots")]);
        let err = DatabaseConfig::from_lookup(Some("postgres://x/db".to_string()), lookup)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == "DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let config = DatabaseConfig {
            min_connections: 30,
            ..DatabaseConfig::development()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == "DB_MIN_CONNECTIONS"));
    }

    #[test]
    fn test_zero_max_is_rejected() {
        let config = DatabaseConfig {
            max_connections: 0,
            min_connections: 0,
            ..DatabaseConfig::development()
        };
        assert!(config.validate().is_err());
    }
}

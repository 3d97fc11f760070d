//! # Service Configuration Module
//!
//! Provides configuration management for the music library service.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an `AppConfig`
//! instance holding every setting the server needs at startup. Values are
//! normally loaded from environment variables with [`AppConfig::from_env`],
//! validated fail-fast, and then passed explicitly to the components that need
//! them. Nothing here is stored in process-wide state.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `ENV` | `development` | `development` or `production` |
//! | `HOST` | `0.0.0.0` | Interface the HTTP server binds to |
//! | `PORT` | `8080` | Port the HTTP server binds to |
//! | `DATABASE_URL` | `sqlite:music-library.db` | SQLite connection string |
//! | `DB_MAX_CONNECTIONS` | `5` | Connection pool upper bound |
//! | `LOG_DIR` | unset | Directory for rolling log files |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AppConfig;
//!
//! let config = AppConfig::from_env().expect("invalid configuration");
//! println!("listening on {}", config.server.bind_address());
//! ```
//!
//! Tests and embedders can skip the environment entirely:
//!
//! ```
//! use core_runtime::config::{AppConfig, Environment};
//!
//! let config = AppConfig::builder()
//!     .environment(Environment::Production)
//!     .port(9000)
//!     .database_url("sqlite::memory:")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.server.port, 9000);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite:music-library.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Deployment mode of the service.
///
/// Drives logging verbosity and output format; see
/// [`LoggingConfig::for_environment`](crate::logging::LoggingConfig::for_environment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Verbose, human-readable logs
    #[default]
    Development,
    /// Structured JSON logs at info level
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "debug" => Ok(Environment::Development),
            "production" | "prod" | "release" => Ok(Environment::Production),
            other => Err(Error::InvalidVariable {
                key: "ENV".to_string(),
                message: format!(
                    "unknown environment '{}', expected 'development' or 'production'",
                    other
                ),
            }),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Record store connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// SQLite connection string (e.g. `sqlite:music.db`, `sqlite::memory:`)
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Complete service configuration.
///
/// Use [`AppConfigBuilder`] or [`AppConfig::from_env`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// Deployment mode
    pub environment: Environment,
    /// HTTP listener
    pub server: ServerConfig,
    /// Record store
    pub database: DatabaseSettings,
    /// Directory for rolling log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed, or if the
    /// resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = AppConfig::builder();

        if let Some(env) = get("ENV") {
            builder = builder.environment(env.parse()?);
        }

        if let Some(host) = get("HOST") {
            builder = builder.host(host);
        }

        if let Some(port) = get("PORT") {
            builder = builder.port(parse_number("PORT", &port)?);
        }

        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }

        if let Some(max) = get("DB_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse_number("DB_MAX_CONNECTIONS", &max)?);
        }

        if let Some(dir) = get("LOG_DIR") {
            builder = builder.log_dir(dir);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Port is not zero
    /// - Host and database URL are not empty
    /// - Connection pool allows at least one connection
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("Server host cannot be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.database.url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "Database pool must allow at least one connection".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| Error::InvalidVariable {
        key: key.to_string(),
        message: format!("'{}' is not a valid number: {}", raw, e),
    })
}

/// Builder for constructing [`AppConfig`] instances.
///
/// Unset options fall back to the documented defaults; [`build`](Self::build)
/// validates the result.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    environment: Option<Environment>,
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    log_dir: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Sets the deployment mode.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the interface to bind.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the TCP port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the SQLite connection string.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the connection pool upper bound.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Enables rolling file logs in `dir`.
    pub fn log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the assembled configuration is invalid.
    pub fn build(self) -> Result<AppConfig> {
        let defaults_server = ServerConfig::default();
        let defaults_db = DatabaseSettings::default();

        let config = AppConfig {
            environment: self.environment.unwrap_or_default(),
            server: ServerConfig {
                host: self.host.unwrap_or(defaults_server.host),
                port: self.port.unwrap_or(defaults_server.port),
            },
            database: DatabaseSettings {
                url: self.database_url.unwrap_or(defaults_db.url),
                max_connections: self.max_connections.unwrap_or(defaults_db.max_connections),
            },
            log_dir: self.log_dir,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:music-library.db");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!("debug".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("release".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ENV", "production"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("DATABASE_URL", "sqlite:/tmp/songs.db"),
            ("DB_MAX_CONNECTIONS", "8"),
            ("LOG_DIR", "/var/log/music"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database.url, "sqlite:/tmp/songs.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/music")));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_environment() {
        let result = AppConfig::from_lookup(lookup_from(&[("ENV", "staging")]));
        match result {
            Err(Error::InvalidVariable { key, message }) => {
                assert_eq!(key, "ENV");
                assert!(message.contains("staging"));
            }
            other => panic!("expected InvalidVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_treats_empty_as_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", ""), ("ENV", "  ")])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        match result {
            Err(Error::InvalidVariable { key, .. }) => assert_eq!(key, "PORT"),
            other => panic!("expected InvalidVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let result = AppConfig::builder().port(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let result = AppConfig::builder().database_url("   ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_connections() {
        let result = AppConfig::builder().max_connections(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_environment_serializes_lowercase() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }
}

//! Store configuration loaded from the process environment.
//!
//! # Responsibility
//! - Resolve connection string, logical database name and resolver override.
//! - Reject malformed values before any connection is attempted.
//!
//! # Invariants
//! - `database_name` is a safe file stem (`[A-Za-z0-9_-]+`).
//! - `dns_servers` only holds parsed IP addresses.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::path::PathBuf;

pub const ENV_DB_URL: &str = "REFLECTION_DB_URL";
pub const ENV_DB_NAME: &str = "REFLECTION_DB_NAME";
pub const ENV_DNS_SERVERS: &str = "REFLECTION_DNS_SERVERS";

pub const DEFAULT_DATABASE_NAME: &str = "reflection_db";
const MEMORY_CONNECTION: &str = ":memory:";
const FILE_SCHEME: &str = "file://";
const DB_FILE_EXTENSION: &str = "sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidDatabaseName(String),
    InvalidDnsServer(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required environment variable {key}"),
            Self::InvalidDatabaseName(name) => write!(
                f,
                "invalid database name `{name}`; expected ASCII letters, digits, `_` or `-`"
            ),
            Self::InvalidDnsServer(value) => {
                write!(f, "invalid DNS server `{value}`; expected an IP address")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

/// Initialization inputs for `ReflectionStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub connection_string: String,
    pub database_name: String,
    pub dns_servers: Vec<IpAddr>,
}

impl StoreConfig {
    /// Builds a config with the default database name and no resolver override.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            dns_servers: Vec::new(),
        }
    }

    /// Config for a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_CONNECTION)
    }

    /// Loads config from `REFLECTION_DB_URL`, `REFLECTION_DB_NAME` and
    /// `REFLECTION_DNS_SERVERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads config through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let connection_string = read(ENV_DB_URL).ok_or(ConfigError::Missing(ENV_DB_URL))?;
        let database_name =
            read(ENV_DB_NAME).unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        let dns_servers = match read(ENV_DNS_SERVERS) {
            Some(raw) => parse_dns_servers(&raw)?,
            None => Vec::new(),
        };

        let config = Self {
            connection_string,
            database_name,
            dns_servers,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = database_name.into();
        self
    }

    pub fn with_dns_servers(mut self, dns_servers: Vec<IpAddr>) -> Self {
        self.dns_servers = dns_servers;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection_string.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_DB_URL));
        }
        let valid_name = !self.database_name.is_empty()
            && self
                .database_name
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid_name {
            return Err(ConfigError::InvalidDatabaseName(self.database_name.clone()));
        }
        Ok(())
    }

    /// Resolves the connection string into a concrete storage location.
    ///
    /// `:memory:` maps to an in-memory database; anything else is a directory
    /// (optionally `file://`-prefixed) holding `<database_name>.sqlite3`.
    pub fn location(&self) -> StoreLocation {
        let trimmed = self.connection_string.trim();
        if trimmed == MEMORY_CONNECTION {
            return StoreLocation::Memory;
        }
        let dir = trimmed.strip_prefix(FILE_SCHEME).unwrap_or(trimmed);
        StoreLocation::File(
            PathBuf::from(dir).join(format!("{}.{DB_FILE_EXTENSION}", self.database_name)),
        )
    }
}

fn parse_dns_servers(raw: &str) -> Result<Vec<IpAddr>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidDnsServer(entry.to_string()))
        })
        .collect()
}

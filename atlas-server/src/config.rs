//! Process settings
//!
//! Read once at startup from a TOML file, then overridden from the
//! environment:
//!
//! ```toml
//! [server]
//! port = 9000
//! production = false
//!
//! [database.development]
//! host = "localhost"
//! user = "atlas"
//! password = "atlas"
//! database = "atlas_dev"
//!
//! [database.production]
//! host = "db.internal"
//! user = "atlas"
//! database = "atlas"
//! max_connections = 20
//! ```
//!
//! Environment variables:
//!   ATLAS_PORT         # overrides server.port
//!   ATLAS_PRODUCTION   # overrides server.production (true/false/1/0)
//!   DATABASE_URL       # replaces the selected database profile entirely

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use atlas_db::PoolSettings;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::error::ConfigError;

/// Settings file used when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_PG_PORT: u16 = 5432;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseProfiles,

    /// Set from `DATABASE_URL`; takes precedence over both profiles.
    #[serde(skip)]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Selects `[database.production]` instead of `[database.development]`.
    #[serde(default)]
    pub production: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            production: false,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatabaseProfiles {
    pub development: Option<DatabaseProfile>,
    pub production: Option<DatabaseProfile>,
}

/// One PostgreSQL connection profile
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseProfile {
    #[serde(default = "default_pg_host")]
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

impl DatabaseProfile {
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        let defaults = PoolSettings::default();
        PoolSettings {
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            acquire_timeout: self
                .acquire_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        }
    }
}

/// Resolved database connection for this process
#[derive(Debug, Clone)]
pub struct DatabaseTarget {
    /// `"development"`, `"production"` or `"DATABASE_URL"`, for logging.
    pub source: &'static str,
    pub options: PgConnectOptions,
    pub pool: PoolSettings,
}

impl Settings {
    /// Load settings from `path`, or from `./settings.toml` when no path
    /// is given, then apply environment overrides.
    ///
    /// An explicitly requested file must exist. The default file is
    /// optional so the process can run from `DATABASE_URL` alone.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let mut settings = if path.exists() {
            Self::from_file(&path)?
        } else if explicit {
            return Err(ConfigError::NotFound { path });
        } else {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Self::default()
        };

        settings.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `ATLAS_PORT`, `ATLAS_PRODUCTION` and `DATABASE_URL` using
    /// `var` to look each one up.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("ATLAS_PORT") {
            self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "ATLAS_PORT",
                value,
            })?;
        }

        if let Some(value) = var("ATLAS_PRODUCTION") {
            self.server.production = parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                var: "ATLAS_PRODUCTION",
                value,
            })?;
        }

        if let Some(url) = var("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database_url = Some(url);
        }

        Ok(())
    }

    /// Name of the profile `server.production` selects.
    pub fn profile_name(&self) -> &'static str {
        if self.server.production {
            "production"
        } else {
            "development"
        }
    }

    /// Resolve the database this process should talk to.
    pub fn database_target(&self) -> Result<DatabaseTarget, ConfigError> {
        if let Some(url) = &self.database_url {
            let options: PgConnectOptions =
                url.parse().map_err(ConfigError::InvalidDatabaseUrl)?;
            return Ok(DatabaseTarget {
                source: "DATABASE_URL",
                options,
                pool: PoolSettings::default(),
            });
        }

        let profile = if self.server.production {
            self.database.production.as_ref()
        } else {
            self.database.development.as_ref()
        };
        let name = self.profile_name();
        let profile = profile.ok_or(ConfigError::MissingProfile { profile: name })?;

        Ok(DatabaseTarget {
            source: name,
            options: profile.connect_options(),
            pool: profile.pool_settings(),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_pg_host() -> String {
    "localhost".to_string()
}

fn default_pg_port() -> u16 {
    DEFAULT_PG_PORT
}

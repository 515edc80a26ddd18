//! Error types for atlas-server

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Settings could not be loaded or resolved
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read settings file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("No [database.{profile}] profile configured and DATABASE_URL is not set")]
    MissingProfile { profile: &'static str },

    #[error("Invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),
}

/// Server error type
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::MissingProfile {
            profile: "production",
        };
        assert_eq!(
            err.to_string(),
            "No [database.production] profile configured and DATABASE_URL is not set"
        );

        let err = ConfigError::InvalidEnv {
            var: "ATLAS_PORT",
            value: "eighty".into(),
        };
        assert_eq!(err.to_string(), "Invalid value 'eighty' for ATLAS_PORT");
    }
}

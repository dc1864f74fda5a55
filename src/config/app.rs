//! Application configuration loading.
//!
//! Settings come from an optional `homie.toml` file with environment
//! variables taking precedence (`DATABASE_URL`, `HOMIE_BIND_ADDR`). Missing
//! values fall back to local-development defaults, so the server starts with
//! no configuration at all.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/homie.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Configuration structure representing the homie.toml file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Database connection URL
    pub database_url: Option<String>,
    /// Address the HTTP server binds to
    pub bind_address: Option<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse homie.toml: {e}"),
    })
}

/// Resolves the application configuration.
///
/// Reads `./homie.toml` when present, then applies environment overrides
/// (`DATABASE_URL`, `HOMIE_BIND_ADDR`), then defaults.
pub fn load_app_configuration() -> Result<AppConfig> {
    let file = if Path::new("homie.toml").exists() {
        load_file_config("homie.toml")?
    } else {
        FileConfig::default()
    };

    let database_url = std::env::var("DATABASE_URL").ok().or(file.database_url);
    let bind_address = std::env::var("HOMIE_BIND_ADDR").ok().or(file.bind_address);

    Ok(AppConfig {
        database_url: database_url.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        bind_address: bind_address.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_file_config() {
        let toml_str = r#"
            database_url = "sqlite://test/homie.sqlite?mode=rwc"
            bind_address = "0.0.0.0:9000"
        "#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite://test/homie.sqlite?mode=rwc")
        );
        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn test_parse_partial_file_config() {
        let config: FileConfig = toml::from_str("bind_address = \"127.0.0.1:3000\"").unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_address.as_deref(), Some("127.0.0.1:3000"));
    }
}

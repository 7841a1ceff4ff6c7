use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::utils::paths::get_config_path;

/// Default port the API server listens on
pub const DEFAULT_API_PORT: u16 = 5000;

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "MINERVA_API_URL";

fn default_api_base_url() -> String {
    format!("http://localhost:{DEFAULT_API_PORT}")
}

fn default_server_port() -> u16 {
    DEFAULT_API_PORT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL the client talks to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Port `minerva serve` binds to
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Overrides the default database location (~/.minerva/minerva.db)
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            server_port: default_server_port(),
            database_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            config.api_base_url = url;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.server_port, DEFAULT_API_PORT);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
        api_base_url = "https://minerva.example.com"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_base_url, "https://minerva.example.com");
        // Missing fields fall back to defaults
        assert_eq!(config.server_port, DEFAULT_API_PORT);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.server_port = 8080;

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("api_base_url"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server_port, 8080);
    }
}

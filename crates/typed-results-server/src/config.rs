// File: src/config.rs
// Purpose: Server configuration parsed from results.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "RESULTS_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "results.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Endpoint metadata publication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Serve the endpoint registry as JSON (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Route the registry is served on (default: "/_endpoints")
    #[serde(default = "default_metadata_route")]
    pub route: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_metadata_route() -> String {
    "/_endpoints".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            route: default_metadata_route(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load from `$RESULTS_CONFIG`, falling back to ./results.toml
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Apply `HOST` and `PORT` from the environment.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {:?}", port))?;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.metadata.enabled);
        assert_eq!(config.metadata.route, "/_endpoints");
    }

    #[test]
    fn test_empty_config() {
        let path = std::env::temp_dir().join(format!("results-empty-{}.toml", std::process::id()));
        std::fs::write(&path, "  \n").unwrap();

        let loaded = Config::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap().bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_custom_metadata() {
        let toml = r#"
            [server]
            port = 8080

            [metadata]
            enabled = false
            route = "/api/meta"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.metadata.enabled);
        assert_eq!(config.metadata.route, "/api/meta");
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("does-not-exist/results.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }
}

//! Application configuration.
//!
//! Defaults, overlaid by an optional TOML file, overlaid by CLI flags and
//! environment variables.

use std::path::Path;

use adgraph_graph::GraphConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub neo4j: GraphConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [neo4j]
            uri = "bolt://graph.internal:7687"

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.neo4j.uri, "bolt://graph.internal:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_no_file_is_default() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.neo4j.uri, GraphConfig::default().uri);
        assert_eq!(config.server.port, 3040);
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(AppConfig::parse("[server]\nport = \"eighty\"").is_err());
    }
}

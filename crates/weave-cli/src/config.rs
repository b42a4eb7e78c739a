//! Process configuration.
//!
//! Defaults, then an optional TOML file, then environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use weave_graph::{GraphBackend, GraphConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub graph: GraphConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".weave/weave.db"),
        }
    }
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
            port: 8000,
        }
    }
}

impl AppConfig {
    /// Load from `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override fields from environment variables looked up through `env`.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = env("DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(uri) = env("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(user) = env("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Some(password) = env("NEO4J_PASSWORD") {
            self.graph.password = password;
        }
        if let Some(database) = env("NEO4J_DATABASE") {
            self.graph.database = database;
        }
        if let Some(backend) = env("GRAPH_BACKEND") {
            self.graph.backend = GraphBackend::from_str(&backend)
                .with_context(|| format!("GRAPH_BACKEND must be 'neo4j' or 'memory', got '{}'", backend))?;
        }
        if let Some(secs) = env("GRAPH_TIMEOUT_SECS") {
            self.graph.timeout_secs = secs
                .parse()
                .with_context(|| format!("GRAPH_TIMEOUT_SECS must be a whole number, got '{}'", secs))?;
        }
        if let Some(host) = env("WEAVE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env("WEAVE_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("WEAVE_PORT must be a port number, got '{}'", port))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, PathBuf::from(".weave/weave.db"));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.graph.backend, GraphBackend::Neo4j);
        assert_eq!(config.graph.uri, "bolt://localhost:7687");
    }

    #[test]
    fn test_toml_sections_are_partial() {
        let config = AppConfig::from_toml(
            r#"
            [graph]
            backend = "memory"
            timeout_secs = 2

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.graph.backend, GraphBackend::Memory);
        assert_eq!(config.graph.timeout_secs, 2);
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NEO4J_URI", "bolt://graph:7687"),
            ("GRAPH_BACKEND", "memory"),
            ("WEAVE_PORT", "8080"),
        ]);
        let mut config = AppConfig::from_toml("[server]\nport = 9000\n").unwrap();
        config.apply_env(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.graph.uri, "bolt://graph:7687");
        assert_eq!(config.graph.backend, GraphBackend::Memory);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_bad_env_values_are_errors() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_env(|key| (key == "WEAVE_PORT").then(|| "http".to_string()))
            .is_err());
        assert!(config
            .apply_env(|key| (key == "GRAPH_BACKEND").then(|| "postgres".to_string()))
            .is_err());
    }
}

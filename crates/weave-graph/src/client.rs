//! Neo4j connection client.

use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::error::{GraphError, GraphResult};

/// Which graph store the process talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphBackend {
    #[default]
    Neo4j,
    /// Process-local graph; nothing survives a restart.
    Memory,
}

impl GraphBackend {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "neo4j" => Some(Self::Neo4j),
            "memory" | "in-memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub backend: GraphBackend,
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
    /// Bound on every graph call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: GraphBackend::Neo4j,
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 200,
            timeout_secs: 5,
        }
    }
}

impl GraphConfig {
    /// Per-call timeout, clamped to 1..=60 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 60))
    }
}

/// Client for Neo4j graph operations.
///
/// One client is built at startup and shared by every request. `neo4rs::Graph`
/// is a connection pool, so each call checks out its own session.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Build the connection pool without touching the network.
    ///
    /// neo4rs uses a lazy deadpool, so this succeeds even when Neo4j is down;
    /// failures surface on the first query as [`GraphError::Unavailable`].
    pub async fn open(config: &GraphConfig) -> GraphResult<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Unavailable(format!("Invalid Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| GraphError::Unavailable(format!("Failed to create Neo4j pool: {}", e)))?;

        info!(uri = %config.uri, database = %config.database, "Neo4j pool created");
        Ok(Self { graph })
    }

    /// Cheap round trip used for health checks.
    pub async fn ping(&self) -> GraphResult<()> {
        self.graph.run(Query::new("RETURN 1".to_string())).await?;
        Ok(())
    }

    /// Execute a Cypher statement that returns no results.
    pub async fn execute(&self, query: Query) -> GraphResult<()> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a Cypher query and collect every row.
    pub async fn query(&self, query: Query) -> GraphResult<Vec<Row>> {
        let mut stream = self.graph.execute(query).await?;

        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and decode every row into `T` by column name.
    pub async fn query_as<T: DeserializeOwned>(&self, query: Query) -> GraphResult<Vec<T>> {
        self.query(query)
            .await?
            .iter()
            .map(|row| row.to::<T>().map_err(GraphError::from))
            .collect()
    }

    /// Execute a query expected to yield at most one row.
    pub async fn query_one<T: DeserializeOwned>(&self, query: Query) -> GraphResult<Option<T>> {
        Ok(self.query_as::<T>(query).await?.into_iter().next())
    }

    /// Release the pool. Outstanding clones keep their connections until dropped.
    pub fn close(self) {
        drop(self.graph);
        info!("Neo4j client closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_clamped() {
        let mut config = GraphConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        config.timeout_secs = 0;
        assert_eq!(config.timeout(), Duration::from_secs(1));
        config.timeout_secs = 600;
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!(GraphBackend::from_str("Neo4j"), Some(GraphBackend::Neo4j));
        assert_eq!(GraphBackend::from_str("memory"), Some(GraphBackend::Memory));
        assert_eq!(GraphBackend::from_str("postgres"), None);
    }
}

//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use weave_db::DbPool;
use weave_graph::{GraphBackend, GraphClient, GraphService, GraphStore, InMemoryGraph};

use crate::config::AppConfig;

pub mod analytics;
pub mod db;
pub mod decision;
pub mod event;
pub mod graph;
pub mod serve;

/// ContextWeave - decisions, their events, and how they connect
#[derive(Parser)]
#[command(name = "weave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "WEAVE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve(serve::ServeArgs),

    /// Primary database commands
    #[command(subcommand)]
    Db(db::DbCommands),

    /// Manage decisions
    #[command(subcommand)]
    Decision(decision::DecisionCommands),

    /// Record and list events
    #[command(subcommand)]
    Event(event::EventCommands),

    /// Graph mirror and temporal queries
    #[command(subcommand)]
    Graph(graph::GraphCommands),

    /// Primary-store analytics
    #[command(subcommand)]
    Analytics(analytics::AnalyticsCommands),
}

impl Cli {
    pub async fn execute(self, config: AppConfig) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, &config).await,
            Commands::Db(cmd) => db::execute(cmd, &config),
            Commands::Decision(cmd) => decision::execute(cmd, &config).await,
            Commands::Event(cmd) => event::execute(cmd, &config).await,
            Commands::Graph(cmd) => graph::execute(cmd, &config).await,
            Commands::Analytics(cmd) => analytics::execute(cmd, &config),
        }
    }
}

/// Open the primary database, creating and migrating it if needed.
pub(crate) fn open_db(config: &AppConfig) -> Result<DbPool> {
    Ok(weave_db::init_pool(&config.database.path)?)
}

/// Graph handles built from config.
pub(crate) struct GraphHandles {
    pub service: GraphService,
    /// Present for the Neo4j backend, so callers can run schema setup and close the pool.
    pub client: Option<GraphClient>,
}

/// Build the graph store for the configured backend.
///
/// Never fails on an unreachable Neo4j: the service degrades and each call
/// reports the failure instead.
pub(crate) async fn open_graph(config: &AppConfig, pool: &DbPool) -> Result<GraphHandles> {
    let (store, client): (Arc<dyn GraphStore>, Option<GraphClient>) = match config.graph.backend {
        GraphBackend::Neo4j => {
            let client = GraphClient::open(&config.graph).await?;
            (Arc::new(client.clone()), Some(client))
        }
        GraphBackend::Memory => (Arc::new(InMemoryGraph::new()), None),
    };

    let service = GraphService::new(store, Arc::new(pool.clone()), config.graph.timeout());
    if !service.health().await {
        warn!(uri = %config.graph.uri, "Graph store not reachable; graph features will be degraded");
        eprintln!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!("graph store at {} is unreachable", config.graph.uri).dimmed()
        );
    }
    Ok(GraphHandles { service, client })
}

//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to .weave/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let pool = super::open_db(config)?;
    let graph = super::open_graph(config, &pool).await?;
    if let Some(client) = &graph.client {
        if let Err(e) = weave_graph::schema::initialize_schema(client).await {
            warn!(error = %e, "Graph schema setup skipped");
        }
    }

    println!();
    println!("  {} {}", "ContextWeave".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), host, port);
    println!("  {}    http://{}:{}/health", "Health".green(), host, port);
    println!(
        "  {}     {}",
        "Graph".green(),
        match &graph.client {
            Some(_) => config.graph.uri.as_str(),
            None => "in-memory",
        }
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = weave_web::AppState::new(Arc::new(pool), Arc::new(graph.service));
    weave_web::run_server(state, &host, port, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    if let Some(client) = graph.client {
        client.close();
    }
    Ok(())
}

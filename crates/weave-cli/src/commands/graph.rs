//! Graph mirror and query commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use weave_graph::{GraphService, SyncReport, TraversalDepth};

use crate::config::AppConfig;
use crate::output::{self, event_type_colored, truncate};

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Create graph constraints and indexes
    Schema,

    /// Mirror the primary store into the graph (everything, or one entity)
    Sync {
        /// Only this decision
        #[arg(long, conflicts_with = "event")]
        decision: Option<i64>,
        /// Only this event (and its decision)
        #[arg(long)]
        event: Option<i64>,
    },

    /// Node and relationship counts
    Stats,

    /// Events of a decision in graph creation order
    Timeline {
        /// Decision ID
        decision_id: i64,
    },

    /// Decisions reachable through shared events
    Related {
        /// Decision ID
        decision_id: i64,
        /// Traversal depth (1-6)
        #[arg(long, default_value_t = TraversalDepth::default(), allow_negative_numbers = true)]
        depth: TraversalDepth,
    },

    /// Direct causes and effects of an event
    Causality {
        /// Event ID
        event_id: i64,
    },

    /// Reach of a decision
    Impact {
        /// Decision ID
        decision_id: i64,
    },

    /// Decisions whose title or description contains a pattern (case-sensitive)
    Search {
        pattern: String,
    },
}

pub async fn execute(cmd: GraphCommands, config: &AppConfig) -> Result<()> {
    let pool = super::open_db(config)?;
    let graph = super::open_graph(config, &pool).await?;
    let service = &graph.service;

    match cmd {
        GraphCommands::Schema => match &graph.client {
            Some(client) => {
                weave_graph::schema::initialize_schema(client).await?;
                println!("{} Graph schema ready", "✓".green().bold());
            }
            None => println!("{}", "In-memory graph has no schema to create.".dimmed()),
        },
        GraphCommands::Sync { decision, event } => match (decision, event) {
            (Some(id), _) => output::print_sync_outcome(&service.mirror_decision(id).await),
            (_, Some(id)) => output::print_sync_outcome(&service.mirror_event(id).await),
            (None, None) => {
                let report = sync_all(service).await?;
                output::print_sync_report(&report);
                if !report.is_clean() {
                    bail!("{} entities failed to mirror", report.failures.len());
                }
            }
        },
        GraphCommands::Stats => match service.global_stats().await {
            Some(stats) => {
                println!("{}", "Graph".bold());
                println!("{}", "─".repeat(30));
                println!("  Decisions:     {}", stats.decision_count.to_string().cyan());
                println!("  Events:        {}", stats.event_count.to_string().cyan());
                println!("  HAS_EVENT:     {}", stats.relationship_count.to_string().cyan());
            }
            None => bail!("Graph store unavailable"),
        },
        GraphCommands::Timeline { decision_id } => {
            let entries = service.timeline(decision_id).await;
            if entries.is_empty() {
                println!("{}", "No events mirrored for this decision.".dimmed());
            }
            for entry in &entries {
                println!(
                    "  {} {:<8} {:<14} {}",
                    entry.timestamp.to_string().dimmed(),
                    format!("#{}", entry.event_id),
                    event_type_colored(&entry.event_type),
                    truncate(&entry.description, 40)
                );
            }
        }
        GraphCommands::Related { decision_id, depth } => {
            println!("{} #{} (depth={})", "Related to".bold(), decision_id, depth);
            println!("{}", "─".repeat(50));
            let related = service.related_decisions_with(decision_id, depth).await;
            if related.is_empty() {
                println!("{}", "No related decisions found.".dimmed());
            }
            for r in &related {
                println!(
                    "  {} #{:<6} {} {}",
                    "→".dimmed(),
                    r.decision_id,
                    r.title.cyan(),
                    format!("({} hops)", r.distance).dimmed()
                );
            }
        }
        GraphCommands::Causality { event_id } => match service.causality_chain(event_id).await {
            Some(chain) => {
                println!(
                    "{} #{} {}",
                    "Event".bold(),
                    chain.event_id,
                    event_type_colored(&chain.event_type)
                );
                for cause in &chain.causes {
                    println!("  {} #{} {}", "←".yellow(), cause.event_id, cause.event_type);
                }
                for effect in &chain.effects {
                    println!("  {} #{} {}", "→".green(), effect.event_id, effect.event_type);
                }
                if chain.causes.is_empty() && chain.effects.is_empty() {
                    println!("{}", "  No causal links.".dimmed());
                }
            }
            None => println!("{}", format!("Event #{} is not in the graph.", event_id).dimmed()),
        },
        GraphCommands::Impact { decision_id } => match service.decision_impact(decision_id).await {
            Some(impact) => {
                println!("{} {}", "Impact of".bold(), impact.title.cyan());
                println!("{}", "─".repeat(50));
                println!("  Events:            {}", impact.event_count);
                println!("  Downstream events: {}", impact.downstream_events);
                println!("  Predecessors:      {}", impact.predecessor_count);
                println!("  Successors:        {}", impact.successor_count);
            }
            None => println!("{}", format!("Decision #{} is not in the graph.", decision_id).dimmed()),
        },
        GraphCommands::Search { pattern } => {
            let matches = service.search_by_pattern(&pattern).await;
            if matches.is_empty() {
                println!("{}", "No matching decisions.".dimmed());
            }
            for m in &matches {
                println!(
                    "  #{:<6} {:<40} {} events",
                    m.decision_id,
                    truncate(&m.title, 38),
                    m.event_count
                );
            }
        }
    }

    if let Some(client) = graph.client {
        client.close();
    }
    Ok(())
}

/// Mirror every entity with a progress bar.
async fn sync_all(service: &GraphService) -> Result<SyncReport> {
    println!("{}", "Syncing to graph...".bold());
    let targets = service.sync_targets().await?;

    let bar = ProgressBar::new(targets.len() as u64);
    bar.set_style(ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos}/{len} {msg}")?.progress_chars("=> "));

    let mut report = SyncReport::default();
    for target in targets {
        bar.set_message(target.to_string());
        let outcome = service.mirror_target(target).await;
        report.record(target, &outcome);
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(report)
}

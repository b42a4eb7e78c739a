//! Event commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use weave_core::event::model::NewEvent;
use weave_core::Page;

use crate::config::AppConfig;
use crate::output;

#[derive(Subcommand)]
pub enum EventCommands {
    /// Record an event against a decision
    Add {
        /// Decision ID
        decision_id: i64,
        /// Event type (proposed, approved, rejected, implemented, on_hold, review, updated, or any tag)
        event_type: String,
        /// Where the event came from
        #[arg(short, long)]
        source: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List events, newest first
    List {
        /// Only events of this decision, oldest first
        #[arg(long)]
        decision: Option<i64>,
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

pub async fn execute(cmd: EventCommands, config: &AppConfig) -> Result<()> {
    let pool = super::open_db(config)?;

    match cmd {
        EventCommands::Add {
            decision_id,
            event_type,
            source,
            description,
        } => {
            let event = weave_core::event::create_event(
                &pool,
                &NewEvent {
                    decision_id,
                    event_type,
                    source,
                    description,
                },
            )?;
            println!(
                "{} Event {} {} on decision #{}",
                "✓".green().bold(),
                format!("#{}", event.id).cyan(),
                output::event_type_colored(&event.event_type),
                event.decision_id
            );

            let graph = super::open_graph(config, &pool).await?;
            output::print_sync_outcome(&graph.service.mirror_event(event.id).await);
            Ok(())
        }
        EventCommands::List { decision, limit } => {
            let events = match decision {
                Some(id) => weave_core::event::list_events_for_decision(&pool, id, Page::new(0, limit))?,
                None => weave_core::event::list_recent_events(&pool, limit)?,
            };
            output::print_events_table(&events);
            Ok(())
        }
    }
}

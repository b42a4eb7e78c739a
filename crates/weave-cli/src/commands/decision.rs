//! Decision commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use weave_core::decision::model::NewDecision;
use weave_core::event::DECISION_EVENTS_LIMIT;
use weave_core::Page;

use crate::config::AppConfig;
use crate::output;

#[derive(Subcommand)]
pub enum DecisionCommands {
    /// Record a new decision
    Add {
        /// Decision title
        title: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Background the decision was made in
        #[arg(short, long)]
        context: Option<String>,
    },

    /// List active decisions
    List {
        #[arg(long, default_value = "0")]
        skip: i64,
        #[arg(long, default_value = "20")]
        limit: i64,
    },

    /// Show a decision and its events
    Show {
        /// Decision ID
        id: i64,
    },
}

pub async fn execute(cmd: DecisionCommands, config: &AppConfig) -> Result<()> {
    let pool = super::open_db(config)?;

    match cmd {
        DecisionCommands::Add {
            title,
            description,
            context,
        } => {
            let decision = weave_core::decision::create_decision(
                &pool,
                &NewDecision {
                    title,
                    description,
                    context,
                },
            )?;
            println!(
                "{} Decision {} {}",
                "✓".green().bold(),
                format!("#{}", decision.id).cyan(),
                decision.title
            );

            let graph = super::open_graph(config, &pool).await?;
            output::print_sync_outcome(&graph.service.mirror_decision(decision.id).await);
            Ok(())
        }
        DecisionCommands::List { skip, limit } => {
            let decisions = weave_core::decision::list_decisions(&pool, Page::new(skip, limit))?;
            output::print_decisions_table(&decisions);
            Ok(())
        }
        DecisionCommands::Show { id } => {
            let decision = weave_core::decision::get_decision(&pool, id)?;
            output::print_decision(&decision);

            let events = weave_core::event::list_events_for_decision(&pool, id, Page::new(0, DECISION_EVENTS_LIMIT))?;
            println!();
            println!("{}", "Events".bold());
            output::print_events_table(&events);
            Ok(())
        }
    }
}

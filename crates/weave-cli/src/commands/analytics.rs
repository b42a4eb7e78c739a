//! Analytics commands. These read the primary store only.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use weave_core::analytics::{self, DEFAULT_TIMELINE_DAYS, MAX_TIMELINE_DAYS};

use crate::config::AppConfig;
use crate::output::{event_type_colored, truncate};

#[derive(Subcommand)]
pub enum AnalyticsCommands {
    /// Totals and per-decision event counts
    Overview,

    /// Metrics for one decision
    Decision {
        /// Decision ID
        id: i64,
    },

    /// How often each event type occurs
    EventTypes,

    /// Decisions created per day
    Timeline {
        #[arg(
            long,
            default_value_t = DEFAULT_TIMELINE_DAYS,
            value_parser = clap::value_parser!(i64).range(1..=MAX_TIMELINE_DAYS)
        )]
        days: i64,
    },

    /// Active decisions by latest event type
    Status,
}

pub fn execute(cmd: AnalyticsCommands, config: &AppConfig) -> Result<()> {
    let pool = super::open_db(config)?;

    match cmd {
        AnalyticsCommands::Overview => {
            let overview = analytics::overview(&pool)?;
            println!("{}", "Overview".bold());
            println!("{}", "─".repeat(50));
            println!("  Decisions:           {}", overview.total_decisions.to_string().cyan());
            println!("  Events:              {}", overview.total_events.to_string().cyan());
            println!("  Events per decision: {}", overview.avg_events_per_decision);
            println!();
            for d in &overview.decisions {
                println!("  {:<6} {:<40} {} events", d.id, truncate(&d.title, 38), d.event_count);
            }
        }
        AnalyticsCommands::Decision { id } => match analytics::decision_metrics(&pool, id)? {
            Some(m) => {
                println!("{} {}", m.title.cyan().bold(), format!("(#{})", m.decision_id).dimmed());
                println!("  Events:      {}", m.event_count);
                println!("  Days active: {}", m.days_active);
                println!("  Last update: {}", m.last_update);
                for (event_type, count) in &m.event_types {
                    println!("    {:<14} {}", event_type_colored(event_type), count);
                }
            }
            None => println!("{}", format!("Decision #{} not found.", id).dimmed()),
        },
        AnalyticsCommands::EventTypes => {
            let dist = analytics::event_type_distribution(&pool)?;
            for entry in &dist.event_types {
                println!("  {:<14} {}", event_type_colored(&entry.event_type), entry.count);
            }
            println!("  {:<14} {}", "total".bold(), dist.total);
        }
        AnalyticsCommands::Timeline { days } => {
            let timeline = analytics::creation_timeline(&pool, days)?;
            println!("{} (last {} days)", "Decisions created".bold(), timeline.period_days);
            if timeline.timeline.is_empty() {
                println!("{}", "No decisions in this period.".dimmed());
            }
            for day in &timeline.timeline {
                println!("  {}  {}", day.date, "▇".repeat(day.decisions_created.clamp(0, 60) as usize));
            }
        }
        AnalyticsCommands::Status => {
            let summary = analytics::status_summary(&pool)?;
            for (status, count) in &summary.statuses {
                println!("  {:<14} {}", event_type_colored(status), count);
            }
            println!("  {:<14} {}", "total".bold(), summary.total_decisions);
        }
    }

    Ok(())
}

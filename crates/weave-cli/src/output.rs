//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use weave_core::decision::model::Decision;
use weave_core::event::model::{Event, EventKind};
use weave_graph::{SyncOutcome, SyncReport};

/// Print a single decision.
pub fn print_decision(decision: &Decision) {
    println!("{} {}", decision.title.cyan().bold(), format!("(#{})", decision.id).dimmed());
    println!();

    if let Some(desc) = &decision.description {
        println!("{}", desc);
        println!();
    }
    if let Some(context) = &decision.context {
        println!("{}: {}", "Context".bold(), context);
    }
    println!("{}: {}", "Created".bold(), decision.created_at);
    println!("{}: {}", "Updated".bold(), decision.updated_at);
}

/// Print decisions as a table.
pub fn print_decisions_table(decisions: &[Decision]) {
    if decisions.is_empty() {
        println!("{}", "No decisions found.".dimmed());
        return;
    }

    println!("{:<8} {:<40} {:<20}", "ID", "Title", "Created");
    println!("{}", "─".repeat(70));

    for d in decisions {
        println!("{:<8} {:<40} {:<20}", d.id, truncate(&d.title, 38), d.created_at.dimmed());
    }
}

/// Print events as a table.
pub fn print_events_table(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events found.".dimmed());
        return;
    }

    println!("{:<8} {:<10} {:<14} {:<20} {}", "ID", "Decision", "Type", "Created", "Description");
    println!("{}", "─".repeat(80));

    for e in events {
        println!(
            "{:<8} {:<10} {:<14} {:<20} {}",
            e.id,
            e.decision_id,
            event_type_colored(&e.event_type),
            e.created_at.dimmed(),
            truncate(e.description.as_deref().unwrap_or(""), 30)
        );
    }
}

pub fn event_type_colored(event_type: &str) -> ColoredString {
    match EventKind::from_str(event_type) {
        Some(EventKind::Approved) | Some(EventKind::Implemented) => event_type.green(),
        Some(EventKind::Rejected) => event_type.red(),
        Some(EventKind::OnHold) => event_type.yellow(),
        Some(EventKind::Proposed) | Some(EventKind::Review) => event_type.cyan(),
        Some(EventKind::Updated) => event_type.normal(),
        None => event_type.dimmed(),
    }
}

/// One-line graph mirror result.
pub fn print_sync_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Synced => println!("  {} {}", "Graph:".dimmed(), "synced".green()),
        SyncOutcome::NotFound => println!("  {} {}", "Graph:".dimmed(), "not found in primary store".yellow()),
        SyncOutcome::Failed { reason } => println!(
            "  {} {} {}",
            "Graph:".dimmed(),
            "mirror failed".red(),
            format!("({}); run 'weave graph sync' to repair", reason).dimmed()
        ),
    }
}

pub fn print_sync_report(report: &SyncReport) {
    let heading = if report.is_clean() {
        "Sync complete:".green().bold()
    } else {
        "Sync finished with failures:".yellow().bold()
    };
    println!("\n{}", heading);
    println!("  Decisions mirrored: {}", report.decisions_synced);
    println!("  Events mirrored:    {}", report.events_synced);
    if report.not_found > 0 {
        println!("  Vanished mid-sync:  {}", report.not_found);
    }
    for (target, reason) in &report.failures {
        println!("  {} {}: {}", "✗".red(), target, reason.dimmed());
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("décision longue", 5), "déci…");
    }
}

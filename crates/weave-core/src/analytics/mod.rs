//! Aggregate analytics computed from the primary store.
//!
//! Nothing here touches the graph: these numbers stay correct even when the
//! graph mirror is stale or unreachable.

pub mod model;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use weave_db::queries::{decisions, events};
use weave_db::{DbError, DbPool};

use crate::error::{WeaveError, WeaveResult};
use model::*;

/// Status reported for decisions that have no events yet.
pub const PENDING_STATUS: &str = "pending";

/// Default trailing window for the creation timeline.
pub const DEFAULT_TIMELINE_DAYS: i64 = 30;

/// Longest trailing window the creation timeline accepts (about a century).
pub const MAX_TIMELINE_DAYS: i64 = 36_500;

const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Upper bound used when an aggregate needs every row.
const ALL_ROWS: i64 = i64::MAX;

/// Parse a `datetime('now')` timestamp.
pub fn parse_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DB_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Metrics for one active decision, or `None` if it does not exist.
pub fn decision_metrics(pool: &DbPool, decision_id: i64) -> WeaveResult<Option<DecisionMetrics>> {
    decision_metrics_at(pool, decision_id, Utc::now())
}

/// Same as [`decision_metrics`] with an explicit clock.
pub fn decision_metrics_at(
    pool: &DbPool,
    decision_id: i64,
    now: DateTime<Utc>,
) -> WeaveResult<Option<DecisionMetrics>> {
    let decision = match decisions::get_active_decision(pool, decision_id) {
        Ok(row) => row,
        Err(DbError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(WeaveError::Database(e)),
    };

    let events = events::list_events_for_decision(pool, decision_id, 0, ALL_ROWS)?;

    let mut event_types: BTreeMap<String, usize> = BTreeMap::new();
    for event in &events {
        *event_types.entry(event.event_type.clone()).or_default() += 1;
    }

    let last_update = events
        .iter()
        .map(|e| e.created_at.as_str())
        .max()
        .unwrap_or(decision.created_at.as_str())
        .to_string();

    let days_active = parse_db_timestamp(&decision.created_at)
        .map(|created| (now - created).num_days())
        .unwrap_or(0);

    Ok(Some(DecisionMetrics {
        decision_id,
        title: decision.title,
        created_at: decision.created_at,
        event_count: events.len(),
        event_types,
        days_active,
        last_update,
    }))
}

/// Aggregate metrics over all active decisions, busiest first.
pub fn overview(pool: &DbPool) -> WeaveResult<Overview> {
    let active = decisions::list_active_decisions(pool, 0, ALL_ROWS)?;
    let total_events = events::count_events(pool)?;

    let mut summaries = Vec::with_capacity(active.len());
    for d in active {
        let event_count = events::list_events_for_decision(pool, d.id, 0, ALL_ROWS)?.len();
        summaries.push(DecisionSummary {
            id: d.id,
            title: d.title,
            event_count,
            created_at: d.created_at,
        });
    }
    // Stable sort keeps id order among equal counts.
    summaries.sort_by(|a, b| b.event_count.cmp(&a.event_count));

    let avg_events_per_decision = if summaries.is_empty() {
        0.0
    } else {
        round_one_decimal(total_events as f64 / summaries.len() as f64)
    };

    Ok(Overview {
        total_decisions: summaries.len(),
        total_events,
        avg_events_per_decision,
        decisions: summaries,
    })
}

/// Distribution of event types over all events.
pub fn event_type_distribution(pool: &DbPool) -> WeaveResult<EventTypeDistribution> {
    let counts = events::event_type_counts(pool)?;
    let total = counts.iter().map(|(_, n)| n).sum();

    Ok(EventTypeDistribution {
        event_types: counts
            .into_iter()
            .map(|(event_type, count)| EventTypeCount { event_type, count })
            .collect(),
        total,
    })
}

/// Decisions created per day over the last `days` days.
pub fn creation_timeline(pool: &DbPool, days: i64) -> WeaveResult<CreationTimeline> {
    creation_timeline_at(pool, days, Utc::now())
}

/// Same as [`creation_timeline`] with an explicit clock.
pub fn creation_timeline_at(pool: &DbPool, days: i64, now: DateTime<Utc>) -> WeaveResult<CreationTimeline> {
    if !(1..=MAX_TIMELINE_DAYS).contains(&days) {
        return Err(WeaveError::validation(format!(
            "Timeline period must be between 1 and {} days",
            MAX_TIMELINE_DAYS
        )));
    }

    let cutoff = (now - Duration::days(days)).format(DB_TIMESTAMP_FORMAT).to_string();
    let rows = decisions::decisions_created_per_day(pool, &cutoff)?;

    Ok(CreationTimeline {
        period_days: days,
        timeline: rows
            .into_iter()
            .map(|(date, decisions_created)| DailyCount { date, decisions_created })
            .collect(),
    })
}

/// Group active decisions by the type of their latest event.
pub fn status_summary(pool: &DbPool) -> WeaveResult<StatusSummary> {
    let active = decisions::list_active_decisions(pool, 0, ALL_ROWS)?;

    let mut statuses: BTreeMap<String, usize> = BTreeMap::new();
    for d in &active {
        let status = events::latest_event_type(pool, d.id)?
            .unwrap_or_else(|| PENDING_STATUS.to_string());
        *statuses.entry(status).or_default() += 1;
    }

    Ok(StatusSummary {
        statuses,
        total_decisions: active.len(),
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_db::queries::decisions::insert_decision;
    use weave_db::queries::events::insert_event;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        pool
    }

    fn set_created_at(pool: &DbPool, id: i64, ts: &str) {
        pool.with_conn(|conn| {
            conn.execute(
                "UPDATE decisions SET created_at = ?1 WHERE id = ?2",
                weave_db::rusqlite::params![ts, id],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_decision_metrics() {
        let pool = pool();
        let id = insert_decision(&pool, "Launch v2", None, None).unwrap();
        insert_event(&pool, id, "proposed", None, None).unwrap();
        insert_event(&pool, id, "approved", None, None).unwrap();
        insert_event(&pool, id, "approved", None, None).unwrap();
        set_created_at(&pool, id, "2026-01-01 00:00:00");

        let now = parse_db_timestamp("2026-01-11 12:00:00").unwrap();
        let metrics = decision_metrics_at(&pool, id, now).unwrap().unwrap();
        assert_eq!(metrics.event_count, 3);
        assert_eq!(metrics.event_types.get("approved"), Some(&2));
        assert_eq!(metrics.days_active, 10);
        assert_ne!(metrics.last_update, metrics.created_at);

        assert!(decision_metrics(&pool, 999).unwrap().is_none());
    }

    #[test]
    fn test_overview_sorted_by_event_count() {
        let pool = pool();
        let quiet = insert_decision(&pool, "Quiet", None, None).unwrap();
        let busy = insert_decision(&pool, "Busy", None, None).unwrap();
        insert_event(&pool, busy, "proposed", None, None).unwrap();
        insert_event(&pool, busy, "approved", None, None).unwrap();
        insert_event(&pool, quiet, "proposed", None, None).unwrap();

        let overview = overview(&pool).unwrap();
        assert_eq!(overview.total_decisions, 2);
        assert_eq!(overview.total_events, 3);
        assert_eq!(overview.avg_events_per_decision, 1.5);
        assert_eq!(overview.decisions[0].id, busy);
        assert_eq!(overview.decisions[1].id, quiet);
    }

    #[test]
    fn test_overview_empty() {
        let pool = pool();
        let overview = overview(&pool).unwrap();
        assert_eq!(overview.total_decisions, 0);
        assert_eq!(overview.avg_events_per_decision, 0.0);
    }

    #[test]
    fn test_event_type_distribution() {
        let pool = pool();
        let id = insert_decision(&pool, "D", None, None).unwrap();
        insert_event(&pool, id, "review", None, None).unwrap();
        insert_event(&pool, id, "review", None, None).unwrap();
        insert_event(&pool, id, "approved", None, None).unwrap();

        let dist = event_type_distribution(&pool).unwrap();
        assert_eq!(dist.total, 3);
        assert_eq!(dist.event_types[0].event_type, "review");
        assert_eq!(dist.event_types[0].count, 2);
    }

    #[test]
    fn test_creation_timeline_window() {
        let pool = pool();
        let old = insert_decision(&pool, "Old", None, None).unwrap();
        let a = insert_decision(&pool, "A", None, None).unwrap();
        let b = insert_decision(&pool, "B", None, None).unwrap();
        set_created_at(&pool, old, "2025-06-01 09:00:00");
        set_created_at(&pool, a, "2026-01-10 09:00:00");
        set_created_at(&pool, b, "2026-01-10 17:30:00");

        let now = parse_db_timestamp("2026-01-15 00:00:00").unwrap();
        let timeline = creation_timeline_at(&pool, 30, now).unwrap();
        assert_eq!(timeline.period_days, 30);
        assert_eq!(timeline.timeline.len(), 1);
        assert_eq!(timeline.timeline[0].date, "2026-01-10");
        assert_eq!(timeline.timeline[0].decisions_created, 2);

        assert!(creation_timeline_at(&pool, 0, now).is_err());
        assert!(creation_timeline_at(&pool, MAX_TIMELINE_DAYS, now).is_ok());
        assert!(matches!(
            creation_timeline_at(&pool, MAX_TIMELINE_DAYS + 1, now),
            Err(WeaveError::ValidationError(_))
        ));
        assert!(creation_timeline_at(&pool, 1_000_000_000_000, now).is_err());
    }

    #[test]
    fn test_status_summary_uses_latest_event() {
        let pool = pool();
        let pending = insert_decision(&pool, "Pending", None, None).unwrap();
        let approved = insert_decision(&pool, "Approved", None, None).unwrap();
        insert_event(&pool, approved, "proposed", None, None).unwrap();
        insert_event(&pool, approved, "approved", None, None).unwrap();
        assert!(events::latest_event_type(&pool, pending).unwrap().is_none());

        let summary = status_summary(&pool).unwrap();
        assert_eq!(summary.total_decisions, 2);
        assert_eq!(summary.statuses.get(PENDING_STATUS), Some(&1));
        assert_eq!(summary.statuses.get("approved"), Some(&1));
        assert_eq!(summary.statuses.get("proposed"), None);
    }
}

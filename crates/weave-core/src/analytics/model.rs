//! Analytics result types.

use serde::Serialize;
use std::collections::BTreeMap;

/// Metrics for one decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionMetrics {
    pub decision_id: i64,
    pub title: String,
    pub created_at: String,
    pub event_count: usize,
    pub event_types: BTreeMap<String, usize>,
    pub days_active: i64,
    pub last_update: String,
}

/// One line of the overview table.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSummary {
    pub id: i64,
    pub title: String,
    pub event_count: usize,
    pub created_at: String,
}

/// Aggregate metrics over all active decisions.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_decisions: usize,
    pub total_events: i64,
    pub avg_events_per_decision: f64,
    pub decisions: Vec<DecisionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventTypeCount {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: i64,
}

/// How often each event type occurs.
#[derive(Debug, Clone, Serialize)]
pub struct EventTypeDistribution {
    pub event_types: Vec<EventTypeCount>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub decisions_created: i64,
}

/// Decisions created per day over a trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct CreationTimeline {
    pub period_days: i64,
    pub timeline: Vec<DailyCount>,
}

/// Active decisions grouped by the type of their latest event.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub statuses: BTreeMap<String, usize>,
    pub total_decisions: usize,
}

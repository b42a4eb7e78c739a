//! Primary store to graph synchronization.
//!
//! Mirroring is explicit and per entity: after a primary-store write the caller
//! asks for that ID to be mirrored. Upserts are idempotent, so mirroring the
//! same ID again is also how a failed or partial mirror is repaired.

pub mod decision_sync;
pub mod event_sync;
pub mod primary;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::model::{DecisionNode, EventNode};
use crate::store::GraphStore;

/// Decision fields the mirror reads from the primary store.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Event fields the mirror reads from the primary store.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub id: i64,
    pub decision_id: i64,
    pub event_type: String,
    pub description: Option<String>,
}

/// Read access to the system of record.
#[async_trait]
pub trait PrimaryStore: Send + Sync {
    async fn decision_by_id(&self, id: i64) -> GraphResult<Option<DecisionRecord>>;
    async fn event_by_id(&self, id: i64) -> GraphResult<Option<EventRecord>>;
    async fn decision_ids(&self) -> GraphResult<Vec<i64>>;
    async fn event_ids(&self) -> GraphResult<Vec<i64>>;
}

/// What a mirror call achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The graph now reflects the primary-store row.
    Synced,
    /// The primary store has no such row; nothing was written.
    NotFound,
    /// The graph write failed. The primary-store write stands; the graph may be stale.
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }

    pub fn failed(err: &GraphError) -> Self {
        Self::Failed {
            reason: err.to_string(),
        }
    }
}

/// One entity to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Decision(i64),
    Event(i64),
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decision(id) => write!(f, "decision {}", id),
            Self::Event(id) => write!(f, "event {}", id),
        }
    }
}

/// Totals for a bulk resync.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub decisions_synced: usize,
    pub events_synced: usize,
    pub not_found: usize,
    pub failures: Vec<(SyncTarget, String)>,
}

impl SyncReport {
    pub fn record(&mut self, target: SyncTarget, outcome: &SyncOutcome) {
        match (outcome, target) {
            (SyncOutcome::Synced, SyncTarget::Decision(_)) => self.decisions_synced += 1,
            (SyncOutcome::Synced, SyncTarget::Event(_)) => self.events_synced += 1,
            (SyncOutcome::NotFound, _) => self.not_found += 1,
            (SyncOutcome::Failed { reason }, _) => self.failures.push((target, reason.clone())),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Mirror one decision. Reads the primary store first so a missing row writes nothing.
pub async fn mirror_decision(
    graph: &dyn GraphStore,
    primary: &dyn PrimaryStore,
    decision_id: i64,
) -> GraphResult<SyncOutcome> {
    let Some(record) = primary.decision_by_id(decision_id).await? else {
        debug!(decision_id, "Decision not in primary store, skipping mirror");
        return Ok(SyncOutcome::NotFound);
    };

    let node = DecisionNode {
        id: record.id,
        title: record.title,
        description: record.description.unwrap_or_default(),
    };
    graph.upsert_decision(&node).await?;

    Ok(SyncOutcome::Synced)
}

/// Mirror one event, mirroring its parent decision first.
pub async fn mirror_event(
    graph: &dyn GraphStore,
    primary: &dyn PrimaryStore,
    event_id: i64,
) -> GraphResult<SyncOutcome> {
    let Some(record) = primary.event_by_id(event_id).await? else {
        debug!(event_id, "Event not in primary store, skipping mirror");
        return Ok(SyncOutcome::NotFound);
    };

    match mirror_decision(graph, primary, record.decision_id).await? {
        SyncOutcome::Synced => {}
        _ => return Err(GraphError::MissingParent(record.decision_id)),
    }

    let node = EventNode {
        id: record.id,
        decision_id: record.decision_id,
        event_type: record.event_type,
        description: record.description.unwrap_or_default(),
    };
    graph.upsert_event(&node).await?;

    Ok(SyncOutcome::Synced)
}

/// Every entity in the primary store, decisions before events.
pub async fn sync_targets(primary: &dyn PrimaryStore) -> GraphResult<Vec<SyncTarget>> {
    let mut targets: Vec<SyncTarget> = primary
        .decision_ids()
        .await?
        .into_iter()
        .map(SyncTarget::Decision)
        .collect();
    targets.extend(primary.event_ids().await?.into_iter().map(SyncTarget::Event));
    Ok(targets)
}

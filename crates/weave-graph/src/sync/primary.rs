//! [`PrimaryStore`] over the SQLite pool.

use async_trait::async_trait;
use weave_db::queries::{decisions, events};
use weave_db::{DbError, DbPool};

use super::{DecisionRecord, EventRecord, PrimaryStore};
use crate::error::{GraphError, GraphResult};

fn optional<T>(result: Result<T, DbError>) -> GraphResult<Option<T>> {
    match result {
        Ok(row) => Ok(Some(row)),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(GraphError::Primary(e.to_string())),
    }
}

#[async_trait]
impl PrimaryStore for DbPool {
    /// Soft-deleted decisions are still returned; deactivation is not mirrored.
    async fn decision_by_id(&self, id: i64) -> GraphResult<Option<DecisionRecord>> {
        Ok(optional(decisions::get_decision(self, id))?.map(|row| DecisionRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }))
    }

    async fn event_by_id(&self, id: i64) -> GraphResult<Option<EventRecord>> {
        Ok(optional(events::get_event(self, id))?.map(|row| EventRecord {
            id: row.id,
            decision_id: row.decision_id,
            event_type: row.event_type,
            description: row.description,
        }))
    }

    async fn decision_ids(&self) -> GraphResult<Vec<i64>> {
        decisions::list_decision_ids(self).map_err(|e| GraphError::Primary(e.to_string()))
    }

    async fn event_ids(&self) -> GraphResult<Vec<i64>> {
        events::list_event_ids(self).map_err(|e| GraphError::Primary(e.to_string()))
    }
}

//! Temporal timeline of a decision.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::TimelineEntry;
use crate::GraphClient;

pub(crate) const DECISION_TIMELINE: &str = "MATCH (:Decision {id: $decision_id})-[:HAS_EVENT]->(e:Event)
     RETURN e.id AS event_id,
            e.event_type AS event_type,
            coalesce(e.description, '') AS description,
            e.created_at AS timestamp
     ORDER BY e.created_at ASC, e.id ASC";

/// All events of a decision in ascending creation order.
pub async fn decision_timeline(client: &GraphClient, decision_id: i64) -> GraphResult<Vec<TimelineEntry>> {
    let query = Query::new(DECISION_TIMELINE.to_string()).param("decision_id", decision_id);
    client.query_as(query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_broken_by_id() {
        assert!(DECISION_TIMELINE.contains("ORDER BY e.created_at ASC, e.id ASC"));
    }
}

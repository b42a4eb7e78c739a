//! Event upsert into Neo4j.
//!
//! Creates or refreshes:
//! - (:Event {id, event_type, description, created_at})
//! - (:Decision)-[:HAS_EVENT {created_at}]->(:Event)

use neo4rs::Query;
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::model::EventNode;
use crate::GraphClient;

/// One statement so the node and its edge land together. Matching the parent
/// first means a missing decision yields no row and no write.
pub(crate) const UPSERT_EVENT: &str = "MATCH (d:Decision {id: $decision_id})
     MERGE (e:Event {id: $id})
     ON CREATE SET e.created_at = timestamp()
     SET e.event_type = $event_type,
         e.description = $description
     MERGE (d)-[r:HAS_EVENT]->(e)
     ON CREATE SET r.created_at = timestamp()
     RETURN e.id AS id";

pub(crate) fn upsert_event_query(node: &EventNode) -> Query {
    Query::new(UPSERT_EVENT.to_string())
        .param("id", node.id)
        .param("decision_id", node.decision_id)
        .param("event_type", node.event_type.as_str())
        .param("description", node.description.as_str())
}

/// Upsert an event node and link it to its decision.
pub async fn upsert_event(client: &GraphClient, node: &EventNode) -> GraphResult<()> {
    let rows = client.query(upsert_event_query(node)).await?;
    if rows.is_empty() {
        return Err(GraphError::MissingParent(node.decision_id));
    }

    debug!(event_id = node.id, decision_id = node.decision_id, "Upserted event node");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_matched_before_merge() {
        let match_pos = UPSERT_EVENT.find("MATCH (d:Decision").unwrap();
        let merge_pos = UPSERT_EVENT.find("MERGE (e:Event").unwrap();
        assert!(match_pos < merge_pos);
        assert!(UPSERT_EVENT.contains("MERGE (d)-[r:HAS_EVENT]->(e)"));
    }
}

//! Decision upsert into Neo4j.
//!
//! Creates or refreshes:
//! - (:Decision {id, title, description, created_at})

use neo4rs::Query;
use tracing::debug;

use crate::error::GraphResult;
use crate::model::DecisionNode;
use crate::GraphClient;

/// MERGE on the mirrored id. `created_at` is graph-local and set only when the node is new.
pub(crate) const UPSERT_DECISION: &str = "MERGE (d:Decision {id: $id})
     ON CREATE SET d.created_at = timestamp()
     SET d.title = $title,
         d.description = $description";

pub(crate) fn upsert_decision_query(node: &DecisionNode) -> Query {
    Query::new(UPSERT_DECISION.to_string())
        .param("id", node.id)
        .param("title", node.title.as_str())
        .param("description", node.description.as_str())
}

/// Upsert a decision node.
pub async fn upsert_decision(client: &GraphClient, node: &DecisionNode) -> GraphResult<()> {
    client.execute(upsert_decision_query(node)).await?;
    debug!(decision_id = node.id, title = %node.title, "Upserted decision node");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_at_only_on_create() {
        assert!(UPSERT_DECISION.contains("ON CREATE SET d.created_at = timestamp()"));
        assert_eq!(UPSERT_DECISION.matches("created_at").count(), 1);
    }
}

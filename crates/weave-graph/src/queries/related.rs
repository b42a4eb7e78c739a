//! Decisions related through shared-event paths.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::{RelatedDecision, TraversalDepth};
use crate::GraphClient;

/// The range literal is the fixed ceiling `MAX_TRAVERSAL_DEPTH`; the caller's
/// depth is bound as `$depth` and applied as a filter.
pub(crate) const RELATED_DECISIONS: &str = "MATCH path = (origin:Decision {id: $decision_id})-[:HAS_EVENT*1..6]-(other:Decision)
     WHERE origin <> other AND length(path) <= $depth
     WITH other, min(length(path)) AS distance
     RETURN other.id AS decision_id,
            other.title AS title,
            coalesce(other.description, '') AS description,
            distance
     ORDER BY distance ASC, decision_id ASC
     LIMIT $limit";

/// Distinct decisions within `depth` hops of `decision_id`, nearest first.
pub async fn related_decisions(
    client: &GraphClient,
    decision_id: i64,
    depth: TraversalDepth,
    limit: usize,
) -> GraphResult<Vec<RelatedDecision>> {
    let query = Query::new(RELATED_DECISIONS.to_string())
        .param("decision_id", decision_id)
        .param("depth", i64::from(depth.get()))
        .param("limit", limit as i64);
    client.query_as(query).await
}

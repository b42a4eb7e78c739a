//! Impact analysis queries.
//!
//! Counts how far a decision reaches: its own events, events those cause, and
//! linked predecessor/successor decisions.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::DecisionImpact;
use crate::GraphClient;

/// Each OPTIONAL MATCH is aggregated before the next so counts do not multiply.
pub(crate) const DECISION_IMPACT: &str = "MATCH (d:Decision {id: $decision_id})
     OPTIONAL MATCH (d)-[:HAS_EVENT]->(e:Event)
     WITH d, count(DISTINCT e) AS event_count
     OPTIONAL MATCH (d)-[:HAS_EVENT]->(:Event)-[:CAUSES]->(downstream:Event)
     WITH d, event_count, count(DISTINCT downstream) AS downstream_events
     OPTIONAL MATCH (d)-[:PREDECESSOR]->(p:Decision)
     WITH d, event_count, downstream_events, count(DISTINCT p) AS predecessor_count
     OPTIONAL MATCH (d)-[:SUCCESSOR]->(s:Decision)
     RETURN d.id AS decision_id,
            d.title AS title,
            event_count,
            downstream_events,
            predecessor_count,
            count(DISTINCT s) AS successor_count";

/// Impact counts for a decision. `None` if the decision is not mirrored.
pub async fn decision_impact(client: &GraphClient, decision_id: i64) -> GraphResult<Option<DecisionImpact>> {
    let query = Query::new(DECISION_IMPACT.to_string()).param("decision_id", decision_id);
    client.query_one(query).await
}

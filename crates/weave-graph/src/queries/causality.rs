//! Immediate cause/effect neighbourhood of an event.
//!
//! `CAUSES` edges have no writer in this system; they are read as-is.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::CausalityChain;
use crate::GraphClient;

pub(crate) const CAUSALITY_CHAIN: &str = "MATCH (e:Event {id: $event_id})
     OPTIONAL MATCH (cause:Event)-[:CAUSES]->(e)
     WITH e, collect(DISTINCT cause) AS causes
     OPTIONAL MATCH (e)-[:CAUSES]->(effect:Event)
     WITH e, causes, collect(DISTINCT effect) AS effects
     RETURN e.id AS event_id,
            e.event_type AS event_type,
            coalesce(e.description, '') AS description,
            [c IN causes | {event_id: c.id, event_type: c.event_type, description: coalesce(c.description, '')}] AS causes,
            [x IN effects | {event_id: x.id, event_type: x.event_type, description: coalesce(x.description, '')}] AS effects";

/// Causes and effects of `event_id`, each sorted by event id. `None` if the event is not mirrored.
pub async fn causality_chain(client: &GraphClient, event_id: i64) -> GraphResult<Option<CausalityChain>> {
    let query = Query::new(CAUSALITY_CHAIN.to_string()).param("event_id", event_id);
    let chain: Option<CausalityChain> = client.query_one(query).await?;

    Ok(chain.map(|mut chain| {
        chain.causes.sort_by_key(|link| link.event_id);
        chain.effects.sort_by_key(|link| link.event_id);
        chain
    }))
}

//! Whole-graph statistics.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::GraphStats;
use crate::GraphClient;

pub(crate) const GLOBAL_STATS: &str = "CALL { MATCH (d:Decision) RETURN count(d) AS decision_count }
     CALL { MATCH (e:Event) RETURN count(e) AS event_count }
     CALL { MATCH (:Decision)-[r:HAS_EVENT]->(:Event) RETURN count(r) AS relationship_count }
     RETURN decision_count, event_count, relationship_count";

/// Decision and event node counts plus the `HAS_EVENT` edge count.
pub async fn global_stats(client: &GraphClient) -> GraphResult<GraphStats> {
    let stats = client.query_one(Query::new(GLOBAL_STATS.to_string())).await?;
    Ok(stats.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{causality, impact, related, search, timeline};
    use crate::sync::{decision_sync, event_sync};

    /// Every statement takes its inputs as `$parameters`; none is a format string.
    #[test]
    fn test_statements_are_parameterized() {
        let statements = [
            decision_sync::UPSERT_DECISION,
            event_sync::UPSERT_EVENT,
            timeline::DECISION_TIMELINE,
            related::RELATED_DECISIONS,
            causality::CAUSALITY_CHAIN,
            impact::DECISION_IMPACT,
            search::SEARCH_DECISIONS,
            GLOBAL_STATS,
        ];
        for statement in statements {
            assert!(!statement.contains("{}"), "placeholder in: {statement}");
        }
        assert!(search::SEARCH_DECISIONS.contains("CONTAINS $pattern"));
        assert!(related::RELATED_DECISIONS.contains("LIMIT $limit"));
    }
}

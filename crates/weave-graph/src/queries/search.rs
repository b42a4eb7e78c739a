//! Substring search over mirrored decisions.

use neo4rs::Query;

use crate::error::GraphResult;
use crate::model::PatternMatch;
use crate::GraphClient;

/// `CONTAINS` is case-sensitive. The pattern is always a bound parameter.
pub(crate) const SEARCH_DECISIONS: &str = "MATCH (d:Decision)
     WHERE d.title CONTAINS $pattern OR d.description CONTAINS $pattern
     OPTIONAL MATCH (d)-[:HAS_EVENT]->(e:Event)
     WITH d, count(e) AS event_count
     RETURN d.id AS decision_id,
            d.title AS title,
            coalesce(d.description, '') AS description,
            event_count
     ORDER BY decision_id ASC
     LIMIT $limit";

/// Decisions whose title or description contains `pattern`.
pub async fn search_by_pattern(client: &GraphClient, pattern: &str, limit: usize) -> GraphResult<Vec<PatternMatch>> {
    let query = Query::new(SEARCH_DECISIONS.to_string())
        .param("pattern", pattern)
        .param("limit", limit as i64);
    client.query_as(query).await
}

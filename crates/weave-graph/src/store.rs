//! The graph store seam.
//!
//! [`GraphStore`] is what the sync layer and [`crate::GraphService`] talk to.
//! [`GraphClient`] implements it with Cypher over bolt; [`crate::InMemoryGraph`]
//! implements the same semantics in process.

use async_trait::async_trait;

use crate::error::GraphResult;
use crate::model::*;
use crate::queries::{causality, impact, related, search, stats, timeline};
use crate::sync::{decision_sync, event_sync};
use crate::GraphClient;

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Round trip to check the store is reachable.
    async fn ping(&self) -> GraphResult<()>;

    /// Create or update a decision node keyed by `id`. `created_at` is stamped on creation only.
    async fn upsert_decision(&self, node: &DecisionNode) -> GraphResult<()>;

    /// Create or update an event node and its `HAS_EVENT` edge from the parent decision.
    ///
    /// Fails with [`crate::GraphError::MissingParent`] and writes nothing when the
    /// parent decision node is absent.
    async fn upsert_event(&self, node: &EventNode) -> GraphResult<()>;

    /// Events of a decision ordered by creation time, ties broken by event id.
    async fn timeline(&self, decision_id: i64) -> GraphResult<Vec<TimelineEntry>>;

    /// Other decisions within `depth` hops along `HAS_EVENT` edges, nearest first.
    async fn related_decisions(
        &self,
        decision_id: i64,
        depth: TraversalDepth,
        limit: usize,
    ) -> GraphResult<Vec<RelatedDecision>>;

    /// Direct `CAUSES` predecessors and successors of an event; `None` if the event is absent.
    async fn causality_chain(&self, event_id: i64) -> GraphResult<Option<CausalityChain>>;

    /// Aggregate reach of a decision; `None` if the decision is absent.
    async fn decision_impact(&self, decision_id: i64) -> GraphResult<Option<DecisionImpact>>;

    /// Decisions whose title or description contains `pattern` (case-sensitive).
    async fn search_by_pattern(&self, pattern: &str, limit: usize) -> GraphResult<Vec<PatternMatch>>;

    /// Node counts by label and the `HAS_EVENT` edge count.
    async fn global_stats(&self) -> GraphResult<GraphStats>;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn ping(&self) -> GraphResult<()> {
        GraphClient::ping(self).await
    }

    async fn upsert_decision(&self, node: &DecisionNode) -> GraphResult<()> {
        decision_sync::upsert_decision(self, node).await
    }

    async fn upsert_event(&self, node: &EventNode) -> GraphResult<()> {
        event_sync::upsert_event(self, node).await
    }

    async fn timeline(&self, decision_id: i64) -> GraphResult<Vec<TimelineEntry>> {
        timeline::decision_timeline(self, decision_id).await
    }

    async fn related_decisions(
        &self,
        decision_id: i64,
        depth: TraversalDepth,
        limit: usize,
    ) -> GraphResult<Vec<RelatedDecision>> {
        related::related_decisions(self, decision_id, depth, limit).await
    }

    async fn causality_chain(&self, event_id: i64) -> GraphResult<Option<CausalityChain>> {
        causality::causality_chain(self, event_id).await
    }

    async fn decision_impact(&self, decision_id: i64) -> GraphResult<Option<DecisionImpact>> {
        impact::decision_impact(self, decision_id).await
    }

    async fn search_by_pattern(&self, pattern: &str, limit: usize) -> GraphResult<Vec<PatternMatch>> {
        search::search_by_pattern(self, pattern, limit).await
    }

    async fn global_stats(&self) -> GraphResult<GraphStats> {
        stats::global_stats(self).await
    }
}

//! Best-effort facade over the graph store.
//!
//! Every call is bounded by the configured timeout. Mirror calls report a
//! [`SyncOutcome`]; read calls turn backend failures into empty or absent
//! results. Failures are logged here and never reach the caller as errors,
//! with one exception: an invalid traversal depth is the caller's mistake and
//! is returned as a [`DepthError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DepthError, GraphError, GraphResult};
use crate::model::*;
use crate::store::GraphStore;
use crate::sync::{self, PrimaryStore, SyncOutcome, SyncReport, SyncTarget};

/// Shared handle used by the web and CLI layers.
#[derive(Clone)]
pub struct GraphService {
    store: Arc<dyn GraphStore>,
    primary: Arc<dyn PrimaryStore>,
    timeout: Duration,
}

impl GraphService {
    pub fn new(store: Arc<dyn GraphStore>, primary: Arc<dyn PrimaryStore>, timeout: Duration) -> Self {
        Self {
            store,
            primary,
            timeout,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> GraphResult<T>
    where
        F: Future<Output = GraphResult<T>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(GraphError::Timeout(self.timeout)))
    }

    /// Mirror one decision into the graph.
    pub async fn mirror_decision(&self, decision_id: i64) -> SyncOutcome {
        let result = self
            .bounded(sync::mirror_decision(self.store.as_ref(), self.primary.as_ref(), decision_id))
            .await;
        match result {
            Ok(outcome) => {
                debug!(decision_id, ?outcome, "Decision mirror finished");
                outcome
            }
            Err(e) => {
                warn!(decision_id, error = %e, "Decision mirror failed; graph may be stale");
                SyncOutcome::failed(&e)
            }
        }
    }

    /// Mirror one event, and its parent decision, into the graph.
    pub async fn mirror_event(&self, event_id: i64) -> SyncOutcome {
        let result = self
            .bounded(sync::mirror_event(self.store.as_ref(), self.primary.as_ref(), event_id))
            .await;
        match result {
            Ok(outcome) => {
                debug!(event_id, ?outcome, "Event mirror finished");
                outcome
            }
            Err(e) => {
                warn!(event_id, error = %e, "Event mirror failed; graph may be stale");
                SyncOutcome::failed(&e)
            }
        }
    }

    pub async fn mirror_target(&self, target: SyncTarget) -> SyncOutcome {
        match target {
            SyncTarget::Decision(id) => self.mirror_decision(id).await,
            SyncTarget::Event(id) => self.mirror_event(id).await,
        }
    }

    /// Every primary-store entity, decisions first.
    pub async fn sync_targets(&self) -> GraphResult<Vec<SyncTarget>> {
        sync::sync_targets(self.primary.as_ref()).await
    }

    /// Re-mirror the whole primary store. Repairs any earlier partial mirror.
    pub async fn mirror_all(&self) -> GraphResult<SyncReport> {
        let targets = self.sync_targets().await?;
        let mut report = SyncReport::default();
        for target in targets {
            let outcome = self.mirror_target(target).await;
            report.record(target, &outcome);
        }
        info!(
            decisions = report.decisions_synced,
            events = report.events_synced,
            failures = report.failures.len(),
            "Full graph sync finished"
        );
        Ok(report)
    }

    pub async fn timeline(&self, decision_id: i64) -> Vec<TimelineEntry> {
        match self.bounded(self.store.timeline(decision_id)).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(decision_id, error = %e, "Timeline query failed");
                Vec::new()
            }
        }
    }

    /// Related decisions for a raw, caller-supplied depth.
    pub async fn related_decisions(&self, decision_id: i64, depth: i64) -> Result<Vec<RelatedDecision>, DepthError> {
        let depth = TraversalDepth::new(depth)?;
        Ok(self.related_decisions_with(decision_id, depth).await)
    }

    pub async fn related_decisions_with(&self, decision_id: i64, depth: TraversalDepth) -> Vec<RelatedDecision> {
        match self
            .bounded(self.store.related_decisions(decision_id, depth, RELATED_LIMIT))
            .await
        {
            Ok(related) => related,
            Err(e) => {
                warn!(decision_id, %depth, error = %e, "Related decisions query failed");
                Vec::new()
            }
        }
    }

    pub async fn causality_chain(&self, event_id: i64) -> Option<CausalityChain> {
        match self.bounded(self.store.causality_chain(event_id)).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!(event_id, error = %e, "Causality query failed");
                None
            }
        }
    }

    pub async fn decision_impact(&self, decision_id: i64) -> Option<DecisionImpact> {
        match self.bounded(self.store.decision_impact(decision_id)).await {
            Ok(impact) => impact,
            Err(e) => {
                warn!(decision_id, error = %e, "Impact query failed");
                None
            }
        }
    }

    pub async fn search_by_pattern(&self, pattern: &str) -> Vec<PatternMatch> {
        match self.bounded(self.store.search_by_pattern(pattern, SEARCH_LIMIT)).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(pattern, error = %e, "Pattern search failed");
                Vec::new()
            }
        }
    }

    /// `None` when the store could not be reached, so callers can tell an empty graph from a dead one.
    pub async fn global_stats(&self) -> Option<GraphStats> {
        match self.bounded(self.store.global_stats()).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "Graph stats query failed");
                None
            }
        }
    }

    pub async fn health(&self) -> bool {
        match self.bounded(self.store.ping()).await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Graph health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGraph;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use weave_db::queries::{decisions, events};
    use weave_db::DbPool;

    fn setup() -> (DbPool, Arc<InMemoryGraph>, GraphService) {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        let graph = Arc::new(InMemoryGraph::new());
        let service = GraphService::new(graph.clone(), Arc::new(pool.clone()), Duration::from_secs(5));
        (pool, graph, service)
    }

    #[tokio::test]
    async fn test_mirror_decision_is_idempotent() {
        let (pool, graph, service) = setup();
        let id = decisions::insert_decision(&pool, "Launch v2", None, None).unwrap();
        let e = events::insert_event(&pool, id, "approved", None, None).unwrap();

        for _ in 0..2 {
            assert_eq!(service.mirror_decision(id).await, SyncOutcome::Synced);
            assert_eq!(service.mirror_event(e).await, SyncOutcome::Synced);
        }

        let stats = service.global_stats().await.unwrap();
        assert_eq!(
            stats,
            GraphStats {
                decision_count: 1,
                event_count: 1,
                relationship_count: 1,
            }
        );
        assert_eq!(graph.has_event_edges(id, e), 1);
    }

    #[tokio::test]
    async fn test_mirror_event_cascades_to_parent() {
        let (pool, graph, service) = setup();
        let d = decisions::insert_decision(&pool, "Adopt Rust", Some("for the CLI"), None).unwrap();
        let e = events::insert_event(&pool, d, "proposed", None, None).unwrap();

        assert_eq!(service.mirror_event(e).await, SyncOutcome::Synced);

        assert!(graph.decision_created_at(d).is_some());
        assert_eq!(graph.has_event_edges(d, e), 1);
        let timeline = service.timeline(d).await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].event_id, e);
    }

    #[tokio::test]
    async fn test_missing_decision_creates_nothing() {
        let (_pool, _graph, service) = setup();
        assert_eq!(service.mirror_decision(999_999).await, SyncOutcome::NotFound);
        assert_eq!(service.mirror_event(999_999).await, SyncOutcome::NotFound);
        assert_eq!(service.global_stats().await, Some(GraphStats::default()));
    }

    #[tokio::test]
    async fn test_timeline_follows_graph_creation_order() {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        let tick = Arc::new(AtomicI64::new(0));
        let clock_tick = tick.clone();
        let graph = Arc::new(InMemoryGraph::with_clock(Arc::new(move || {
            clock_tick.fetch_add(10, Ordering::SeqCst)
        })));
        let service = GraphService::new(graph, Arc::new(pool.clone()), Duration::from_secs(5));

        let d = decisions::insert_decision(&pool, "Pick a database", None, None).unwrap();
        let first = events::insert_event(&pool, d, "proposed", None, None).unwrap();
        let second = events::insert_event(&pool, d, "review", None, None).unwrap();
        let third = events::insert_event(&pool, d, "approved", None, None).unwrap();

        // Mirrored out of id order; the graph stamps t1 < t2 < t3 in call order.
        for id in [third, first, second] {
            assert!(service.mirror_event(id).await.is_synced());
        }

        let order: Vec<i64> = service.timeline(d).await.iter().map(|t| t.event_id).collect();
        assert_eq!(order, vec![third, first, second]);
        let stamps: Vec<i64> = service.timeline(d).await.iter().map(|t| t.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_launch_scenario() {
        let (pool, _graph, service) = setup();
        let d = decisions::insert_decision(&pool, "Launch v2", None, None).unwrap();
        let e = events::insert_event(&pool, d, "approved", None, None).unwrap();

        assert!(service.mirror_decision(d).await.is_synced());
        assert!(service.mirror_event(e).await.is_synced());

        let timeline = service.timeline(d).await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].event_id, e);
        assert_eq!(timeline[0].event_type, "approved");

        let stats = service.global_stats().await.unwrap();
        assert!(stats.decision_count >= 1 && stats.event_count >= 1 && stats.relationship_count >= 1);

        let found = service.search_by_pattern("Launch").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].decision_id, d);
        assert_eq!(found[0].event_count, 1);
        assert_eq!(found[0].description, "");
        assert!(service.search_by_pattern("launch").await.is_empty());
    }

    #[tokio::test]
    async fn test_related_validates_depth_and_caps_results() {
        let (pool, _graph, service) = setup();
        let origin = decisions::insert_decision(&pool, "origin", None, None).unwrap();

        assert!(matches!(
            service.related_decisions(origin, -1).await,
            Err(DepthError::OutOfRange(-1))
        ));
        assert!(service.related_decisions(origin, 0).await.is_err());
        assert!(service.related_decisions(origin, 7).await.is_err());

        assert!(service.mirror_decision(origin).await.is_synced());
        for i in 0..12 {
            let other = decisions::insert_decision(&pool, &format!("other {}", i), None, None).unwrap();
            assert!(service.mirror_decision(other).await.is_synced());
        }
        // Each mirrored event hangs off a single decision, so nothing is shared yet.
        let related = service.related_decisions(origin, 2).await.unwrap();
        assert!(related.is_empty());
        assert!(related.iter().all(|r| r.decision_id != origin));
        assert!(related.len() <= RELATED_LIMIT);
    }

    #[tokio::test]
    async fn test_partial_failure_self_heals() {
        let (pool, graph, service) = setup();
        let d = decisions::insert_decision(&pool, "Move to k8s", None, None).unwrap();
        let e = events::insert_event(&pool, d, "approved", None, None).unwrap();

        graph.set_reject_event_writes(true);
        let outcome = service.mirror_event(e).await;
        assert!(matches!(outcome, SyncOutcome::Failed { .. }));
        // Parent landed, event did not.
        let stats = service.global_stats().await.unwrap();
        assert_eq!((stats.decision_count, stats.event_count), (1, 0));

        graph.set_reject_event_writes(false);
        let report = service.mirror_all().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.decisions_synced, 1);
        assert_eq!(report.events_synced, 1);
        assert_eq!(graph.has_event_edges(d, e), 1);
    }

    #[tokio::test]
    async fn test_unavailable_graph_degrades() {
        let (pool, graph, service) = setup();
        let d = decisions::insert_decision(&pool, "Launch v2", None, None).unwrap();
        graph.set_available(false);

        assert!(matches!(service.mirror_decision(d).await, SyncOutcome::Failed { .. }));
        assert!(service.timeline(d).await.is_empty());
        assert!(service.related_decisions(d, 2).await.unwrap().is_empty());
        assert!(service.causality_chain(1).await.is_none());
        assert!(service.decision_impact(d).await.is_none());
        assert!(service.search_by_pattern("Launch").await.is_empty());
        assert!(service.global_stats().await.is_none());
        assert!(!service.health().await);

        // The primary write is untouched.
        assert_eq!(decisions::get_decision(&pool, d).unwrap().title, "Launch v2");
    }

    #[tokio::test]
    async fn test_impact_and_causality_over_seeded_edges() {
        let (pool, graph, service) = setup();
        let a = decisions::insert_decision(&pool, "A", None, None).unwrap();
        let b = decisions::insert_decision(&pool, "B", None, None).unwrap();
        let ea = events::insert_event(&pool, a, "approved", None, None).unwrap();
        let eb = events::insert_event(&pool, b, "implemented", None, None).unwrap();
        assert!(service.mirror_event(ea).await.is_synced());
        assert!(service.mirror_event(eb).await.is_synced());

        graph.link_causes(ea, eb).unwrap();
        graph.link_successor(a, b).unwrap();
        graph.link_predecessor(b, a).unwrap();

        let impact = service.decision_impact(a).await.unwrap();
        assert_eq!(impact.event_count, 1);
        assert_eq!(impact.downstream_events, 1);
        assert_eq!((impact.predecessor_count, impact.successor_count), (0, 1));

        let chain = service.causality_chain(eb).await.unwrap();
        assert_eq!(chain.causes.iter().map(|c| c.event_id).collect::<Vec<_>>(), vec![ea]);
        assert!(chain.effects.is_empty());
        assert!(service.causality_chain(999_999).await.is_none());
    }

    struct StalledGraph;

    #[async_trait]
    impl GraphStore for StalledGraph {
        async fn ping(&self) -> GraphResult<()> {
            std::future::pending().await
        }
        async fn upsert_decision(&self, _: &DecisionNode) -> GraphResult<()> {
            std::future::pending().await
        }
        async fn upsert_event(&self, _: &EventNode) -> GraphResult<()> {
            std::future::pending().await
        }
        async fn timeline(&self, _: i64) -> GraphResult<Vec<TimelineEntry>> {
            std::future::pending().await
        }
        async fn related_decisions(&self, _: i64, _: TraversalDepth, _: usize) -> GraphResult<Vec<RelatedDecision>> {
            std::future::pending().await
        }
        async fn causality_chain(&self, _: i64) -> GraphResult<Option<CausalityChain>> {
            std::future::pending().await
        }
        async fn decision_impact(&self, _: i64) -> GraphResult<Option<DecisionImpact>> {
            std::future::pending().await
        }
        async fn search_by_pattern(&self, _: &str, _: usize) -> GraphResult<Vec<PatternMatch>> {
            std::future::pending().await
        }
        async fn global_stats(&self) -> GraphResult<GraphStats> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stalled_graph_times_out() {
        let pool = DbPool::in_memory().unwrap();
        weave_db::run_migrations(&pool).unwrap();
        let d = decisions::insert_decision(&pool, "Launch v2", None, None).unwrap();
        let service = GraphService::new(Arc::new(StalledGraph), Arc::new(pool), Duration::from_millis(20));

        match service.mirror_decision(d).await {
            SyncOutcome::Failed { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(!service.health().await);
        assert!(service.timeline(d).await.is_empty());
    }
}

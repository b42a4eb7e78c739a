//! Process-local [`GraphStore`].
//!
//! Mirrors the Cypher semantics of [`crate::GraphClient`] closely enough to run
//! the sync and query layers without a Neo4j server: MERGE-by-id upserts,
//! `created_at` stamped on creation only, undirected variable-length traversal
//! for related decisions. It can also seed the `CAUSES`, `PREDECESSOR` and
//! `SUCCESSOR` edges that no writer in this system produces, and simulate an
//! outage.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{GraphError, GraphResult};
use crate::model::*;
use crate::store::GraphStore;

/// Source of graph-local timestamps (epoch millis).
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

#[derive(Debug, Clone)]
struct StoredDecision {
    title: String,
    description: String,
    created_at: i64,
}

#[derive(Debug, Clone)]
struct StoredEvent {
    event_type: String,
    description: String,
    created_at: i64,
}

#[derive(Debug, Default)]
struct GraphState {
    decisions: BTreeMap<i64, StoredDecision>,
    events: BTreeMap<i64, StoredEvent>,
    /// (decision, event) -> edge created_at
    has_event: BTreeMap<(i64, i64), i64>,
    causes: BTreeSet<(i64, i64)>,
    predecessors: BTreeSet<(i64, i64)>,
    successors: BTreeSet<(i64, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NodeKey {
    Decision(i64),
    Event(i64),
}

/// In-memory graph store.
pub struct InMemoryGraph {
    state: Mutex<GraphState>,
    clock: Clock,
    available: AtomicBool,
    reject_event_writes: AtomicBool,
}

impl Default for InMemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGraph {
    /// Empty graph stamping wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(|| chrono::Utc::now().timestamp_millis()))
    }

    /// Empty graph with a caller-controlled clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
            clock,
            available: AtomicBool::new(true),
            reject_event_writes: AtomicBool::new(false),
        }
    }

    /// Simulate the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make event upserts fail while decision upserts keep working.
    pub fn set_reject_event_writes(&self, reject: bool) {
        self.reject_event_writes.store(reject, Ordering::SeqCst);
    }

    /// Seed a `(cause)-[:CAUSES]->(effect)` edge between existing events.
    pub fn link_causes(&self, cause: i64, effect: i64) -> GraphResult<()> {
        let mut state = self.lock()?;
        if !state.events.contains_key(&cause) || !state.events.contains_key(&effect) {
            return Err(GraphError::Rejected(format!("CAUSES {} -> {}: event not found", cause, effect)));
        }
        state.causes.insert((cause, effect));
        Ok(())
    }

    /// Seed a `(decision)-[:PREDECESSOR]->(other)` edge between existing decisions.
    pub fn link_predecessor(&self, decision: i64, predecessor: i64) -> GraphResult<()> {
        let mut state = self.lock()?;
        Self::require_decisions(&state, decision, predecessor)?;
        state.predecessors.insert((decision, predecessor));
        Ok(())
    }

    /// Seed a `(decision)-[:SUCCESSOR]->(other)` edge between existing decisions.
    pub fn link_successor(&self, decision: i64, successor: i64) -> GraphResult<()> {
        let mut state = self.lock()?;
        Self::require_decisions(&state, decision, successor)?;
        state.successors.insert((decision, successor));
        Ok(())
    }

    /// Graph-local creation time of a decision node.
    pub fn decision_created_at(&self, decision_id: i64) -> Option<i64> {
        self.lock().ok()?.decisions.get(&decision_id).map(|d| d.created_at)
    }

    /// Number of `HAS_EVENT` edges between this pair (0 or 1).
    pub fn has_event_edges(&self, decision_id: i64, event_id: i64) -> usize {
        self.lock()
            .map(|state| usize::from(state.has_event.contains_key(&(decision_id, event_id))))
            .unwrap_or(0)
    }

    fn require_decisions(state: &GraphState, a: i64, b: i64) -> GraphResult<()> {
        if state.decisions.contains_key(&a) && state.decisions.contains_key(&b) {
            Ok(())
        } else {
            Err(GraphError::Rejected(format!("decision link {} -> {}: decision not found", a, b)))
        }
    }

    fn lock(&self) -> GraphResult<MutexGuard<'_, GraphState>> {
        self.state
            .lock()
            .map_err(|_| GraphError::Unavailable("in-memory graph lock poisoned".to_string()))
    }

    /// Lock the state, failing like a dead connection when marked unavailable.
    fn connect(&self) -> GraphResult<MutexGuard<'_, GraphState>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(GraphError::Unavailable("in-memory graph marked unavailable".to_string()));
        }
        self.lock()
    }

    fn event_link(state: &GraphState, event_id: i64) -> Option<CausalLink> {
        state.events.get(&event_id).map(|e| CausalLink {
            event_id,
            event_type: e.event_type.clone(),
            description: e.description.clone(),
        })
    }

    fn neighbours(state: &GraphState, node: NodeKey) -> Vec<NodeKey> {
        match node {
            NodeKey::Decision(d) => state
                .has_event
                .keys()
                .filter(|(dec, _)| *dec == d)
                .map(|(_, ev)| NodeKey::Event(*ev))
                .collect(),
            NodeKey::Event(e) => state
                .has_event
                .keys()
                .filter(|(_, ev)| *ev == e)
                .map(|(dec, _)| NodeKey::Decision(*dec))
                .collect(),
        }
    }
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn ping(&self) -> GraphResult<()> {
        self.connect().map(|_| ())
    }

    async fn upsert_decision(&self, node: &DecisionNode) -> GraphResult<()> {
        let mut state = self.connect()?;
        let clock = &self.clock;
        let entry = state.decisions.entry(node.id).or_insert_with(|| StoredDecision {
            title: String::new(),
            description: String::new(),
            created_at: clock(),
        });
        entry.title = node.title.clone();
        entry.description = node.description.clone();
        Ok(())
    }

    async fn upsert_event(&self, node: &EventNode) -> GraphResult<()> {
        let mut state = self.connect()?;
        if self.reject_event_writes.load(Ordering::SeqCst) {
            return Err(GraphError::Rejected("event writes rejected".to_string()));
        }
        if !state.decisions.contains_key(&node.decision_id) {
            return Err(GraphError::MissingParent(node.decision_id));
        }

        let clock = &self.clock;
        let entry = state.events.entry(node.id).or_insert_with(|| StoredEvent {
            event_type: String::new(),
            description: String::new(),
            created_at: clock(),
        });
        entry.event_type = node.event_type.clone();
        entry.description = node.description.clone();

        state
            .has_event
            .entry((node.decision_id, node.id))
            .or_insert_with(|| clock());
        Ok(())
    }

    async fn timeline(&self, decision_id: i64) -> GraphResult<Vec<TimelineEntry>> {
        let state = self.connect()?;
        let mut entries: Vec<TimelineEntry> = state
            .has_event
            .keys()
            .filter(|(d, _)| *d == decision_id)
            .filter_map(|(_, e)| {
                state.events.get(e).map(|event| TimelineEntry {
                    event_id: *e,
                    event_type: event.event_type.clone(),
                    description: event.description.clone(),
                    timestamp: event.created_at,
                })
            })
            .collect();
        entries.sort_by_key(|entry| (entry.timestamp, entry.event_id));
        Ok(entries)
    }

    async fn related_decisions(
        &self,
        decision_id: i64,
        depth: TraversalDepth,
        limit: usize,
    ) -> GraphResult<Vec<RelatedDecision>> {
        let state = self.connect()?;
        if !state.decisions.contains_key(&decision_id) {
            return Ok(Vec::new());
        }

        let origin = NodeKey::Decision(decision_id);
        let max = i64::from(depth.get());
        let mut distances: HashMap<NodeKey, i64> = HashMap::from([(origin, 0)]);
        let mut queue = VecDeque::from([origin]);

        while let Some(node) = queue.pop_front() {
            let distance = distances[&node];
            if distance == max {
                continue;
            }
            for next in Self::neighbours(&state, node) {
                if !distances.contains_key(&next) {
                    distances.insert(next, distance + 1);
                    queue.push_back(next);
                }
            }
        }

        let mut related: Vec<RelatedDecision> = distances
            .into_iter()
            .filter_map(|(node, distance)| match node {
                NodeKey::Decision(id) if id != decision_id => state.decisions.get(&id).map(|d| RelatedDecision {
                    decision_id: id,
                    title: d.title.clone(),
                    description: d.description.clone(),
                    distance,
                }),
                _ => None,
            })
            .collect();
        related.sort_by_key(|r| (r.distance, r.decision_id));
        related.truncate(limit);
        Ok(related)
    }

    async fn causality_chain(&self, event_id: i64) -> GraphResult<Option<CausalityChain>> {
        let state = self.connect()?;
        let Some(event) = state.events.get(&event_id) else {
            return Ok(None);
        };

        let causes = state
            .causes
            .iter()
            .filter(|(_, effect)| *effect == event_id)
            .filter_map(|(cause, _)| Self::event_link(&state, *cause))
            .collect();
        let effects = state
            .causes
            .iter()
            .filter(|(cause, _)| *cause == event_id)
            .filter_map(|(_, effect)| Self::event_link(&state, *effect))
            .collect();

        Ok(Some(CausalityChain {
            event_id,
            event_type: event.event_type.clone(),
            description: event.description.clone(),
            causes,
            effects,
        }))
    }

    async fn decision_impact(&self, decision_id: i64) -> GraphResult<Option<DecisionImpact>> {
        let state = self.connect()?;
        let Some(decision) = state.decisions.get(&decision_id) else {
            return Ok(None);
        };

        let own_events: BTreeSet<i64> = state
            .has_event
            .keys()
            .filter(|(d, _)| *d == decision_id)
            .map(|(_, e)| *e)
            .collect();
        let downstream: BTreeSet<i64> = state
            .causes
            .iter()
            .filter(|(cause, _)| own_events.contains(cause))
            .map(|(_, effect)| *effect)
            .collect();
        let predecessor_count = state.predecessors.iter().filter(|(d, _)| *d == decision_id).count();
        let successor_count = state.successors.iter().filter(|(d, _)| *d == decision_id).count();

        Ok(Some(DecisionImpact {
            decision_id,
            title: decision.title.clone(),
            event_count: own_events.len() as i64,
            downstream_events: downstream.len() as i64,
            predecessor_count: predecessor_count as i64,
            successor_count: successor_count as i64,
        }))
    }

    async fn search_by_pattern(&self, pattern: &str, limit: usize) -> GraphResult<Vec<PatternMatch>> {
        let state = self.connect()?;
        Ok(state
            .decisions
            .iter()
            .filter(|(_, d)| d.title.contains(pattern) || d.description.contains(pattern))
            .take(limit)
            .map(|(id, d)| PatternMatch {
                decision_id: *id,
                title: d.title.clone(),
                description: d.description.clone(),
                event_count: state.has_event.keys().filter(|(dec, _)| dec == id).count() as i64,
            })
            .collect())
    }

    async fn global_stats(&self) -> GraphResult<GraphStats> {
        let state = self.connect()?;
        Ok(GraphStats {
            decision_count: state.decisions.len() as i64,
            event_count: state.events.len() as i64,
            relationship_count: state.has_event.len() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(id: i64, title: &str) -> DecisionNode {
        DecisionNode {
            id,
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn event(id: i64, decision_id: i64, event_type: &str) -> EventNode {
        EventNode {
            id,
            decision_id,
            event_type: event_type.to_string(),
            description: String::new(),
        }
    }

    /// Two decisions sharing one event, which the Cypher pattern would also see.
    fn shared_event_graph() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        let mut state = graph.state.lock().unwrap();
        for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
            state.decisions.insert(
                id,
                StoredDecision {
                    title: title.to_string(),
                    description: String::new(),
                    created_at: 0,
                },
            );
        }
        for id in [10, 20] {
            state.events.insert(
                id,
                StoredEvent {
                    event_type: "review".to_string(),
                    description: String::new(),
                    created_at: 0,
                },
            );
        }
        // A -10- B -20- C
        state.has_event.insert((1, 10), 0);
        state.has_event.insert((2, 10), 0);
        state.has_event.insert((2, 20), 0);
        state.has_event.insert((3, 20), 0);
        drop(state);
        graph
    }

    #[tokio::test]
    async fn test_upsert_keeps_first_created_at() {
        let tick = Arc::new(std::sync::atomic::AtomicI64::new(100));
        let clock_tick = tick.clone();
        let graph = InMemoryGraph::with_clock(Arc::new(move || clock_tick.load(Ordering::SeqCst)));

        graph.upsert_decision(&decision(1, "Launch v2")).await.unwrap();
        tick.store(500, Ordering::SeqCst);
        graph.upsert_decision(&decision(1, "Launch v2.1")).await.unwrap();

        assert_eq!(graph.decision_created_at(1), Some(100));
        let stats = graph.global_stats().await.unwrap();
        assert_eq!(stats.decision_count, 1);
    }

    #[tokio::test]
    async fn test_event_without_parent_writes_nothing() {
        let graph = InMemoryGraph::new();
        let err = graph.upsert_event(&event(10, 1, "approved")).await.unwrap_err();
        assert!(matches!(err, GraphError::MissingParent(1)));
        assert_eq!(graph.global_stats().await.unwrap(), GraphStats::default());
    }

    #[tokio::test]
    async fn test_related_respects_depth_and_excludes_origin() {
        let graph = shared_event_graph();

        let near = graph.related_decisions(1, TraversalDepth::new(2).unwrap(), 10).await.unwrap();
        assert_eq!(near.iter().map(|r| (r.decision_id, r.distance)).collect::<Vec<_>>(), vec![(2, 2)]);

        let far = graph.related_decisions(1, TraversalDepth::new(4).unwrap(), 10).await.unwrap();
        assert_eq!(
            far.iter().map(|r| (r.decision_id, r.distance)).collect::<Vec<_>>(),
            vec![(2, 2), (3, 4)]
        );

        let capped = graph.related_decisions(1, TraversalDepth::new(4).unwrap(), 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_related_is_capped() {
        let graph = shared_event_graph();
        {
            let mut state = graph.state.lock().unwrap();
            for id in 100..115 {
                state.decisions.insert(
                    id,
                    StoredDecision {
                        title: format!("D{}", id),
                        description: String::new(),
                        created_at: 0,
                    },
                );
                state.has_event.insert((id, 10), 0);
            }
        }

        let related = graph.related_decisions(1, TraversalDepth::default(), RELATED_LIMIT).await.unwrap();
        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|r| r.decision_id != 1 && r.distance == 2));
        assert_eq!(related[0].decision_id, 2);
    }

    #[tokio::test]
    async fn test_seeded_edges_require_nodes() {
        let graph = InMemoryGraph::new();
        assert!(graph.link_causes(1, 2).is_err());
        assert!(graph.link_predecessor(1, 2).is_err());
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let graph = InMemoryGraph::new();
        graph.set_available(false);
        assert!(matches!(graph.ping().await, Err(GraphError::Unavailable(_))));
        assert!(graph.upsert_decision(&decision(1, "x")).await.is_err());
        assert!(graph.global_stats().await.is_err());

        graph.set_available(true);
        graph.ping().await.unwrap();
    }
}

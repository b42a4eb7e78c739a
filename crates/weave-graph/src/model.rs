//! Typed shapes for everything that crosses the graph boundary.
//!
//! Records coming back from the graph are decoded into these structs once, in
//! the adapter. Nothing above the adapter handles raw rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DepthError;

/// Upper bound for variable-length traversals. Also the literal bound in the Cypher pattern.
pub const MAX_TRAVERSAL_DEPTH: u32 = 6;

/// Depth used when the caller does not ask for one.
pub const DEFAULT_TRAVERSAL_DEPTH: u32 = 2;

/// At most this many related decisions are returned.
pub const RELATED_LIMIT: usize = 10;

/// At most this many pattern matches are returned.
pub const SEARCH_LIMIT: usize = 20;

/// A validated traversal depth in `1..=MAX_TRAVERSAL_DEPTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraversalDepth(u32);

impl TraversalDepth {
    pub fn new(depth: i64) -> Result<Self, DepthError> {
        if depth < 1 || depth > i64::from(MAX_TRAVERSAL_DEPTH) {
            return Err(DepthError::OutOfRange(depth));
        }
        Ok(Self(depth as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for TraversalDepth {
    fn default() -> Self {
        Self(DEFAULT_TRAVERSAL_DEPTH)
    }
}

impl TryFrom<i64> for TraversalDepth {
    type Error = DepthError;

    fn try_from(depth: i64) -> Result<Self, Self::Error> {
        Self::new(depth)
    }
}

impl FromStr for TraversalDepth {
    type Err = DepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let depth: i64 = s
            .trim()
            .parse()
            .map_err(|_| DepthError::NotAnInteger(s.to_string()))?;
        Self::new(depth)
    }
}

impl fmt::Display for TraversalDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decision state written to the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionNode {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Event state written to the graph, with its parent decision.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub id: i64,
    pub decision_id: i64,
    pub event_type: String,
    pub description: String,
}

/// One step of a decision's timeline. `timestamp` is the graph-local creation time in epoch millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub event_id: i64,
    pub event_type: String,
    #[serde(default)]
    pub description: String,
    pub timestamp: i64,
}

/// A decision reachable from another through shared-event paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedDecision {
    pub decision_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub distance: i64,
}

/// Lightweight projection of an event on a `CAUSES` edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalLink {
    pub event_id: i64,
    pub event_type: String,
    #[serde(default)]
    pub description: String,
}

/// Immediate `CAUSES` neighbourhood of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalityChain {
    pub event_id: i64,
    pub event_type: String,
    #[serde(default)]
    pub description: String,
    pub causes: Vec<CausalLink>,
    pub effects: Vec<CausalLink>,
}

/// Reach of a decision across the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionImpact {
    pub decision_id: i64,
    pub title: String,
    pub event_count: i64,
    pub downstream_events: i64,
    pub predecessor_count: i64,
    pub successor_count: i64,
}

/// A decision whose title or description contains the search text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub decision_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_count: i64,
}

/// Whole-graph counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub decision_count: i64,
    pub event_count: i64,
    pub relationship_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_bounds() {
        assert_eq!(TraversalDepth::default().get(), 2);
        assert_eq!(TraversalDepth::new(1).unwrap().get(), 1);
        assert_eq!(TraversalDepth::new(6).unwrap().get(), 6);
        assert_eq!(TraversalDepth::new(0), Err(DepthError::OutOfRange(0)));
        assert_eq!(TraversalDepth::new(-1), Err(DepthError::OutOfRange(-1)));
        assert_eq!(TraversalDepth::new(7), Err(DepthError::OutOfRange(7)));
    }

    #[test]
    fn test_depth_parsing_rejects_non_integers() {
        assert_eq!("3".parse::<TraversalDepth>().unwrap().get(), 3);
        assert!(matches!("2.5".parse::<TraversalDepth>(), Err(DepthError::NotAnInteger(_))));
        assert!(matches!(
            "2]-(x) DETACH DELETE x //".parse::<TraversalDepth>(),
            Err(DepthError::NotAnInteger(_))
        ));
        assert!(matches!("-1".parse::<TraversalDepth>(), Err(DepthError::OutOfRange(-1))));
    }

    #[test]
    fn test_chain_decodes_without_description() {
        let chain: CausalityChain = serde_json::from_str(
            r#"{"event_id": 1, "event_type": "approved", "causes": [], "effects": [{"event_id": 2, "event_type": "implemented"}]}"#,
        )
        .unwrap();
        assert_eq!(chain.description, "");
        assert_eq!(chain.effects[0].event_id, 2);
    }
}

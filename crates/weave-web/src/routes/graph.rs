//! Graph query and sync handlers.
//!
//! Graph failures never surface as 5xx here. The service has already logged
//! them and handed back an empty or absent result.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use weave_graph::{
    CausalityChain, DecisionImpact, GraphStats, PatternMatch, RelatedDecision, SyncOutcome, TimelineEntry,
    TraversalDepth,
};

use super::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RelatedQuery {
    /// Kept as text so a non-integer depth is reported as a validation error.
    pub depth: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub graph_available: bool,
    #[serde(flatten)]
    pub stats: GraphStats,
}

#[derive(Serialize)]
pub struct TimelineResponse {
    pub decision_id: i64,
    pub events: Vec<TimelineEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct RelatedResponse {
    pub decision_id: i64,
    pub depth: u32,
    pub related_decisions: Vec<RelatedDecision>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub pattern: String,
    pub results: Vec<PatternMatch>,
    pub count: usize,
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.graph.global_stats().await;
    Json(StatsResponse {
        graph_available: stats.is_some(),
        stats: stats.unwrap_or_default(),
    })
}

pub async fn timeline(State(state): State<AppState>, Path(id): Path<i64>) -> Json<TimelineResponse> {
    let events = state.graph.timeline(id).await;
    Json(TimelineResponse {
        decision_id: id,
        count: events.len(),
        events,
    })
}

pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RelatedQuery>,
) -> ApiResult<Json<RelatedResponse>> {
    let depth = match query.depth.as_deref() {
        Some(raw) => raw
            .parse::<TraversalDepth>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => TraversalDepth::default(),
    };

    let related = state.graph.related_decisions_with(id, depth).await;
    Ok(Json(RelatedResponse {
        decision_id: id,
        depth: depth.get(),
        count: related.len(),
        related_decisions: related,
    }))
}

pub async fn causality(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CausalityChain>> {
    state
        .graph
        .causality_chain(id)
        .await
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Event {} not found in graph", id)))
}

pub async fn impact(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<DecisionImpact>> {
    state
        .graph
        .decision_impact(id)
        .await
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Decision {} not found in graph", id)))
}

pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Json<SearchResponse> {
    let results = state.graph.search_by_pattern(&query.q).await;
    Json(SearchResponse {
        pattern: query.q,
        count: results.len(),
        results,
    })
}

/// Re-mirror one decision. The way to repair a stale graph copy.
pub async fn sync_decision(State(state): State<AppState>, Path(id): Path<i64>) -> (StatusCode, Json<SyncOutcome>) {
    let outcome = state.graph.mirror_decision(id).await;
    (sync_status(&outcome), Json(outcome))
}

pub async fn sync_event(State(state): State<AppState>, Path(id): Path<i64>) -> (StatusCode, Json<SyncOutcome>) {
    let outcome = state.graph.mirror_event(id).await;
    (sync_status(&outcome), Json(outcome))
}

fn sync_status(outcome: &SyncOutcome) -> StatusCode {
    match outcome {
        SyncOutcome::Synced => StatusCode::OK,
        SyncOutcome::NotFound => StatusCode::NOT_FOUND,
        SyncOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    }
}

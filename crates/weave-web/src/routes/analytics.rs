//! Analytics handlers. Primary store only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use weave_core::analytics::{
    self,
    model::{CreationTimeline, DecisionMetrics, EventTypeDistribution, Overview, StatusSummary},
    DEFAULT_TIMELINE_DAYS,
};

use super::{core_error, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    DEFAULT_TIMELINE_DAYS
}

pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<Overview>> {
    Ok(Json(analytics::overview(&state.db).map_err(core_error)?))
}

pub async fn decision_metrics(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DecisionMetrics>> {
    analytics::decision_metrics(&state.db, id)
        .map_err(core_error)?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Decision not found: {}", id)))
}

pub async fn event_types(State(state): State<AppState>) -> ApiResult<Json<EventTypeDistribution>> {
    Ok(Json(analytics::event_type_distribution(&state.db).map_err(core_error)?))
}

pub async fn timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<CreationTimeline>> {
    Ok(Json(analytics::creation_timeline(&state.db, query.days).map_err(core_error)?))
}

pub async fn status(State(state): State<AppState>) -> ApiResult<Json<StatusSummary>> {
    Ok(Json(analytics::status_summary(&state.db).map_err(core_error)?))
}

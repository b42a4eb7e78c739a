//! Decision route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use weave_core::decision::model::{Decision, DecisionUpdate, NewDecision};
use weave_core::event::model::Event;
use weave_core::event::DECISION_EVENTS_LIMIT;
use weave_core::Page;

use super::{core_error, ApiResult, Synced};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DecisionEventsQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

pub async fn list_decisions(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> ApiResult<Json<Vec<Decision>>> {
    let decisions = weave_core::decision::list_decisions(&state.db, page).map_err(core_error)?;
    Ok(Json(decisions))
}

pub async fn create_decision(
    State(state): State<AppState>,
    Json(req): Json<NewDecision>,
) -> ApiResult<(StatusCode, Json<Synced<Decision>>)> {
    let decision = weave_core::decision::create_decision(&state.db, &req).map_err(core_error)?;
    let graph_sync = state.graph.mirror_decision(decision.id).await;

    Ok((
        StatusCode::CREATED,
        Json(Synced {
            record: decision,
            graph_sync,
        }),
    ))
}

pub async fn get_decision(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Decision>> {
    let decision = weave_core::decision::get_decision(&state.db, id).map_err(core_error)?;
    Ok(Json(decision))
}

pub async fn update_decision(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<DecisionUpdate>,
) -> ApiResult<Json<Synced<Decision>>> {
    let decision = weave_core::decision::update_decision(&state.db, id, &req).map_err(core_error)?;
    let graph_sync = state.graph.mirror_decision(decision.id).await;

    Ok(Json(Synced {
        record: decision,
        graph_sync,
    }))
}

/// Soft delete. The graph keeps its copy.
pub async fn delete_decision(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    weave_core::decision::delete_decision(&state.db, id).map_err(core_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_decision_events(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DecisionEventsQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    weave_core::decision::get_decision(&state.db, id).map_err(core_error)?;
    let page = Page::new(query.skip, query.limit.unwrap_or(DECISION_EVENTS_LIMIT));
    let events = weave_core::event::list_events_for_decision(&state.db, id, page).map_err(core_error)?;
    Ok(Json(events))
}

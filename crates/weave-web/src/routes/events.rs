//! Event route handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use weave_core::event::model::{Event, NewEvent};
use weave_core::Page;

use super::{core_error, ApiResult, Synced};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent")]
    pub limit: i64,
}

fn default_recent() -> i64 {
    10
}

pub async fn list_events(State(state): State<AppState>, Query(page): Query<Page>) -> ApiResult<Json<Vec<Event>>> {
    let events = weave_core::event::list_events(&state.db, page).map_err(core_error)?;
    Ok(Json(events))
}

pub async fn list_recent_events(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = weave_core::event::list_recent_events(&state.db, query.limit).map_err(core_error)?;
    Ok(Json(events))
}

/// Record an event and mirror it, together with its decision, into the graph.
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewEvent>,
) -> ApiResult<(StatusCode, Json<Synced<Event>>)> {
    let event = weave_core::event::create_event(&state.db, &req).map_err(core_error)?;
    let graph_sync = state.graph.mirror_event(event.id).await;

    Ok((
        StatusCode::CREATED,
        Json(Synced {
            record: event,
            graph_sync,
        }),
    ))
}

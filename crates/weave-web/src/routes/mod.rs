//! Route handlers.

pub mod analytics;
pub mod decisions;
pub mod events;
pub mod graph;
pub mod health;

use axum::http::StatusCode;
use weave_core::WeaveError;

/// Handler result; errors render as a status code and a plain-text message.
pub type ApiResult<T> = Result<T, (StatusCode, String)>;

pub(crate) fn core_error(e: WeaveError) -> (StatusCode, String) {
    let status = match &e {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        WeaveError::ValidationError(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// A primary-store write plus what happened when it was mirrored.
#[derive(Debug, serde::Serialize)]
pub struct Synced<T> {
    #[serde(flatten)]
    pub record: T,
    pub graph_sync: weave_graph::SyncOutcome,
}

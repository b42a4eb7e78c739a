//! Application state.

use std::sync::Arc;
use weave_db::DbPool;
use weave_graph::GraphService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub graph: Arc<GraphService>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, graph: Arc<GraphService>) -> Self {
        Self { db, graph }
    }
}

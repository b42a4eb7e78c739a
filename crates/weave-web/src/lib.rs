//! ContextWeave Web Server
//!
//! Axum REST API over the primary store, the graph mirror and analytics.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Decisions
        .route(
            "/decisions",
            get(routes::decisions::list_decisions).post(routes::decisions::create_decision),
        )
        .route(
            "/decisions/{id}",
            get(routes::decisions::get_decision)
                .put(routes::decisions::update_decision)
                .delete(routes::decisions::delete_decision),
        )
        .route("/decisions/{id}/events", get(routes::decisions::list_decision_events))
        // Events
        .route(
            "/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route("/events/recent", get(routes::events::list_recent_events))
        // Graph
        .route("/graph/stats", get(routes::graph::stats))
        .route("/graph/timeline/{id}", get(routes::graph::timeline))
        .route("/graph/related/{id}", get(routes::graph::related))
        .route("/graph/causality/{id}", get(routes::graph::causality))
        .route("/graph/impact/{id}", get(routes::graph::impact))
        .route("/graph/search", get(routes::graph::search))
        .route("/graph/sync/decisions/{id}", post(routes::graph::sync_decision))
        .route("/graph/sync/events/{id}", post(routes::graph::sync_event))
        // Analytics
        .route("/analytics/overview", get(routes::analytics::overview))
        .route("/analytics/decisions/{id}", get(routes::analytics::decision_metrics))
        .route("/analytics/event-types", get(routes::analytics::event_types))
        .route("/analytics/timeline", get(routes::analytics::timeline))
        .route("/analytics/status", get(routes::analytics::status));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until the shutdown future resolves.
pub async fn run_server(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

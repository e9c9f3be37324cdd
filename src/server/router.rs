//! Router construction for the dream insight server.

use std::sync::Arc;

use axum::{
    middleware as axum_mw,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{auth::basic_auth, handlers, AppState};

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let auth_config = Arc::clone(&state.auth);

    // Protected on every host
    let app = Router::new()
        .route("/app/api/analyze", post(handlers::analyze))
        .route(
            "/app/api/journal",
            get(handlers::list_journal).post(handlers::add_journal),
        )
        .route("/app/api/journal/:id", delete(handlers::delete_journal))
        .route(
            "/app/api/journal/:id/report",
            get(handlers::journal_report),
        );

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/diag", get(handlers::diag));

    public
        .merge(app)
        .layer(axum_mw::from_fn_with_state(auth_config, basic_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

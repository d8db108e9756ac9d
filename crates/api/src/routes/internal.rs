use axum::routing::get;
use axum::Router;

use crate::handlers::internal;
use crate::state::AppState;

/// Probe routes, mounted at the root (NOT under `/api/v1`).
///
/// ```text
/// GET /internal/info     -> info
/// GET /internal/health   -> health
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/internal/info", get(internal::info))
        .route("/internal/health", get(internal::health))
}

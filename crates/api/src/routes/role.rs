//! Route definitions for the `/roles` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::role;
use crate::state::AppState;

/// Routes mounted at `/roles`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// DELETE /          -> delete_by_ids
/// POST   /search    -> list_by_ids
/// GET    /{id}      -> get_by_id
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(role::list).post(role::create).delete(role::delete_by_ids),
        )
        .route("/search", post(role::list_by_ids))
        .route("/{id}", get(role::get_by_id).delete(role::delete))
}

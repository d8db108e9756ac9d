//! Route definitions for the `/employees` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
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
            get(employee::list).post(employee::create).delete(employee::delete_by_ids),
        )
        .route("/search", post(employee::list_by_ids))
        .route("/{id}", get(employee::get_by_id).delete(employee::delete))
}

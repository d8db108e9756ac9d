pub mod employee;
pub mod internal;
pub mod role;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /roles                 list, create, bulk delete
/// /roles/search          list by ids (POST)
/// /roles/{id}            get, delete
///
/// /employees             list, create, bulk delete
/// /employees/search      list by ids (POST)
/// /employees/{id}        get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/roles", role::router())
        .nest("/employees", employee::router())
}

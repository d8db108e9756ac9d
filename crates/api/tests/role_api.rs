//! HTTP-level integration tests for the `/roles` endpoints.

mod common;

use axum::http::StatusCode;
use common::{assert_failure, body_json, build_test_app, delete_json, get, post_json};
use idm_db::memory::Fault;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: POST /api/v1/roles creates and the role is readable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_role_then_read_it() {
    let (app, _store) = build_test_app();
    let response = post_json(app.clone(), "/api/v1/roles", json!({ "name": "admin" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["data"].as_i64().unwrap();

    let json = body_json(get(app, &format!("/api/v1/roles/{id}")).await).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "admin");
    assert!(json["data"]["createdAt"].is_string());
}

// ---------------------------------------------------------------------------
// Test: blank and overlong names are rejected before any transaction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_name_returns_400() {
    let (app, store) = build_test_app();
    let response = post_json(app, "/api/v1/roles", json!({ "name": "   " })).await;

    assert_failure(response, StatusCode::BAD_REQUEST, &["name: is required"]).await;
    assert_eq!(store.roles.stats().begun, 0);
}

#[tokio::test]
async fn overlong_name_returns_400() {
    let (app, _store) = build_test_app();
    let name = "r".repeat(156);
    let response = post_json(app, "/api/v1/roles", json!({ "name": name })).await;

    assert_failure(
        response,
        StatusCode::BAD_REQUEST,
        &["must not exceed 155 characters"],
    )
    .await;
}

// ---------------------------------------------------------------------------
// Test: duplicate role name is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_role_returns_400() {
    let (app, store) = build_test_app();
    post_json(app.clone(), "/api/v1/roles", json!({ "name": "admin" })).await;

    let response = post_json(app, "/api/v1/roles", json!({ "name": "admin" })).await;

    assert_failure(
        response,
        StatusCode::BAD_REQUEST,
        &["role with name 'admin' already exists"],
    )
    .await;
    assert_eq!(store.roles.count_by_name("admin").await, 1);
}

// ---------------------------------------------------------------------------
// Test: lookup failure during create surfaces its context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exists_check_failure_returns_500() {
    let (app, store) = build_test_app();
    store.roles.inject(Fault::ExistsCheck);

    let response = post_json(app, "/api/v1/roles", json!({ "name": "admin" })).await;

    assert_failure(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        &["error finding role by name: admin"],
    )
    .await;
    let stats = store.roles.stats();
    assert_eq!((stats.inserts, stats.rolled_back), (0, 1));
}

// ---------------------------------------------------------------------------
// Test: read failure is a 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_failure_returns_500() {
    let (app, store) = build_test_app();
    store.roles.inject(Fault::Read);

    let response = get(app, "/api/v1/roles").await;

    assert_failure(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        &["error finding roles"],
    )
    .await;
}

// ---------------------------------------------------------------------------
// Test: non-numeric id is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let (app, _store) = build_test_app();
    let response = get(app, "/api/v1/roles/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: bulk endpoints with empty id lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_id_lists_are_noops() {
    let (app, _store) = build_test_app();
    post_json(app.clone(), "/api/v1/roles", json!({ "name": "admin" })).await;

    let searched = body_json(post_json(app.clone(), "/api/v1/roles/search", json!({ "ids": [] })).await).await;
    assert_eq!(searched, json!({ "success": true, "data": [] }));

    let removed = body_json(delete_json(app.clone(), "/api/v1/roles", json!({ "ids": [] })).await).await;
    assert_eq!(removed["data"], 0);

    let listed = body_json(get(app, "/api/v1/roles").await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: bulk body without `ids` is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_body_without_ids_returns_400() {
    let (app, _store) = build_test_app();
    let response = post_json(app, "/api/v1/roles/search", json!({ "names": ["admin"] })).await;

    assert_failure(response, StatusCode::BAD_REQUEST, &["ids"]).await;
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use idm_api::config::ServerConfig;
use idm_api::router::build_app_router;
use idm_api::services::{ConnectionCheck, EmployeeService, RoleService};
use idm_api::state::AppState;
use idm_db::memory::{MemoryEmployeeRepo, MemoryRoleRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        app_name: "idm".to_string(),
        app_version: "0.0.0".to_string(),
    }
}

/// In-memory repositories shared with the app under test, so tests can
/// inject faults and inspect rows.
pub struct TestStore {
    pub roles: MemoryRoleRepo,
    pub employees: MemoryEmployeeRepo,
}

/// Build the full application router over fresh in-memory repositories.
pub fn build_test_app() -> (Router, TestStore) {
    let store = TestStore {
        roles: MemoryRoleRepo::new(),
        employees: MemoryEmployeeRepo::new(),
    };
    let config = test_config();
    let state = AppState::in_memory(config.clone(), store.roles.clone(), store.employees.clone());
    (build_app_router(state, &config), store)
}

/// Build the router around arbitrary service implementations.
pub fn build_app_with(
    roles: Arc<dyn RoleService>,
    employees: Arc<dyn EmployeeService>,
    connection: Arc<dyn ConnectionCheck>,
) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        roles,
        employees,
        connection,
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::delete(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, "POST", uri, body).await
}

pub async fn delete_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, "DELETE", uri, body).await
}

async fn json_request(app: Router, method: &str, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Assert a failure envelope with the given status and message fragments.
pub async fn assert_failure(response: Response, status: StatusCode, fragments: &[&str]) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json.get("data").is_none());
    let message = json["message"].as_str().expect("message should be a string");
    for fragment in fragments {
        assert!(
            message.contains(fragment),
            "message {message:?} should contain {fragment:?}"
        );
    }
}

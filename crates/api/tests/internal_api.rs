//! Tests for the `/internal` probes and for failures that bypass the
//! services' own error classification.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{assert_failure, body_json, body_text, build_app_with, build_test_app, get, post_json};
use idm_api::services::{EmployeeServiceImpl, FixedConnectionCheck, RoleService, RoleServiceImpl};
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_db::memory::{MemoryEmployeeRepo, MemoryRoleRepo};
use idm_db::models::role::{CreateRoleRequest, NewRole, RoleResponse};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: GET /internal/info reports name and version
// ---------------------------------------------------------------------------

#[tokio::test]
async fn info_reports_name_and_version() {
    let (app, _store) = build_test_app();
    let response = get(app, "/internal/info").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "name": "idm", "version": "0.0.0" }));
}

// ---------------------------------------------------------------------------
// Test: GET /internal/health is Ok while the store answers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_ok_when_reachable() {
    let (app, _store) = build_test_app();
    let response = get(app, "/internal/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Ok");
}

#[tokio::test]
async fn health_is_503_when_unreachable() {
    let app = build_app_with(
        Arc::new(RoleServiceImpl::new(MemoryRoleRepo::new())),
        Arc::new(EmployeeServiceImpl::new(MemoryEmployeeRepo::new())),
        Arc::new(FixedConnectionCheck(false)),
    );
    let response = get(app, "/internal/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "database is unreachable");
}

// ---------------------------------------------------------------------------
// Test: a panicking handler yields the 500 envelope
// ---------------------------------------------------------------------------

/// Role service whose reads fail or panic, for exercising the outer layers.
struct BrokenRoles;

#[async_trait]
impl RoleService for BrokenRoles {
    async fn find_by_id(&self, _id: DbId) -> Result<RoleResponse, CoreError> {
        panic!("role lookup exploded");
    }

    async fn find_all(&self) -> Result<Vec<RoleResponse>, CoreError> {
        Err(CoreError::Internal("error finding roles: pool closed".into()))
    }

    async fn find_all_by_ids(&self, _ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError> {
        Ok(Vec::new())
    }

    async fn save(&self, _role: NewRole) -> Result<DbId, CoreError> {
        Ok(1)
    }

    async fn create_role(&self, _request: CreateRoleRequest) -> Result<DbId, CoreError> {
        Err(CoreError::Internal("error creating transaction".into()))
    }

    async fn delete(&self, _id: DbId) -> Result<(), CoreError> {
        Ok(())
    }

    async fn delete_all_by_ids(&self, _ids: &[DbId]) -> Result<u64, CoreError> {
        Ok(0)
    }
}

fn broken_app() -> axum::Router {
    build_app_with(
        Arc::new(BrokenRoles),
        Arc::new(EmployeeServiceImpl::new(MemoryEmployeeRepo::new())),
        Arc::new(FixedConnectionCheck(true)),
    )
}

#[tokio::test]
async fn panic_returns_generic_500_envelope() {
    let response = get(broken_app(), "/api/v1/roles/1").await;

    assert_failure(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        &["Internal server error"],
    )
    .await;
}

#[tokio::test]
async fn service_internal_error_returns_500() {
    let response = post_json(broken_app(), "/api/v1/roles", json!({ "name": "admin" })).await;

    assert_failure(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        &["Internal server error", "error creating transaction"],
    )
    .await;
}

#[tokio::test]
async fn request_id_is_propagated() {
    let response = get(broken_app(), "/api/v1/roles").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));
}

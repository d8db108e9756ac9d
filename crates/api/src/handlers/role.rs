//! Handlers for the `/roles` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_core::validation::validate;
use idm_db::models::role::{CreateRoleRequest, RoleResponse};

use crate::error::AppResult;
use crate::handlers::{decode, IdsRequest};
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/roles
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DbId>>> {
    let request = decode(payload)?;
    validate(&request).map_err(CoreError::Validation)?;

    let id = state.roles.create_role(request).await?;
    Ok(Json(ApiResponse::ok(id)))
}

/// GET /api/v1/roles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<RoleResponse>>>> {
    let roles = state.roles.find_all().await?;
    Ok(Json(ApiResponse::ok(roles)))
}

/// POST /api/v1/roles/search
pub async fn list_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Vec<RoleResponse>>>> {
    let IdsRequest { ids } = decode(payload)?;
    let roles = state.roles.find_all_by_ids(&ids).await?;
    Ok(Json(ApiResponse::ok(roles)))
}

/// GET /api/v1/roles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<RoleResponse>>> {
    let role = state.roles.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(role)))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.roles.delete(id).await?;
    Ok(Json(ApiResponse::<()>::done()))
}

/// DELETE /api/v1/roles
pub async fn delete_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let IdsRequest { ids } = decode(payload)?;
    let removed = state.roles.delete_all_by_ids(&ids).await?;
    Ok(Json(ApiResponse::ok(removed)))
}

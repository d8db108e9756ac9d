//! Handlers for the `/employees` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_core::validation::validate;
use idm_db::models::employee::{CreateEmployeeRequest, EmployeeResponse};

use crate::error::AppResult;
use crate::handlers::{decode, IdsRequest};
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/employees
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DbId>>> {
    let request = decode(payload)?;
    validate(&request).map_err(CoreError::Validation)?;

    let id = state.employees.create_employee(request).await?;
    Ok(Json(ApiResponse::ok(id)))
}

/// GET /api/v1/employees
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    let employees = state.employees.find_all().await?;
    Ok(Json(ApiResponse::ok(employees)))
}

/// POST /api/v1/employees/search
pub async fn list_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    let IdsRequest { ids } = decode(payload)?;
    let employees = state.employees.find_all_by_ids(&ids).await?;
    Ok(Json(ApiResponse::ok(employees)))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    let employee = state.employees.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(employee)))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.employees.delete(id).await?;
    Ok(Json(ApiResponse::<()>::done()))
}

/// DELETE /api/v1/employees
pub async fn delete_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<IdsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let IdsRequest { ids } = decode(payload)?;
    let removed = state.employees.delete_all_by_ids(&ids).await?;
    Ok(Json(ApiResponse::ok(removed)))
}

pub mod employee;
pub mod internal;
pub mod role;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use idm_core::types::DbId;
use serde::Deserialize;

use crate::error::AppError;

/// Body of the bulk endpoints (`POST /search`, `DELETE /`).
#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<DbId>,
}

/// Unwrap a JSON body, turning decode failures into 400 responses.
pub(crate) fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

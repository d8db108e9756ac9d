//! Employee entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use idm_core::types::{DbId, Timestamp};

/// A row from the `employee` table.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    /// Cleared when the referenced role is deleted.
    pub role_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO for the `employee` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub role_id: Option<DbId>,
}

/// Payload of `POST /employees`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    #[validate(
        custom(function = "idm_core::validation::required_text"),
        length(min = 2, max = 155)
    )]
    pub name: String,
    #[validate(required, range(min = 1))]
    pub role_id: Option<DbId>,
}

impl From<CreateEmployeeRequest> for NewEmployee {
    fn from(request: CreateEmployeeRequest) -> Self {
        Self {
            name: request.name,
            role_id: request.role_id,
        }
    }
}

/// Public projection of an [`Employee`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: DbId,
    pub name: String,
    pub role_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            role_id: employee.role_id,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

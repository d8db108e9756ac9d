//! Employee service: reads, deletes and the unique-name create workflow.

use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_db::models::employee::{CreateEmployeeRequest, Employee, EmployeeResponse, NewEmployee};
use idm_db::store::Repository;

use super::{create_with_unique_name, insert_error};

const ENTITY: &str = "employee";

#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError>;

    async fn find_all(&self) -> Result<Vec<EmployeeResponse>, CoreError>;

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError>;

    /// Plain insert without the uniqueness check.
    async fn save(&self, employee: NewEmployee) -> Result<DbId, CoreError>;

    /// Insert a validated request if no employee has the same name.
    async fn create_employee(&self, request: CreateEmployeeRequest) -> Result<DbId, CoreError>;

    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Returns the number of employees removed.
    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, CoreError>;
}

/// [`EmployeeService`] backed by any employee [`Repository`].
pub struct EmployeeServiceImpl<R> {
    repo: R,
}

impl<R> EmployeeServiceImpl<R>
where
    R: Repository<Entity = Employee, NewEntity = NewEmployee>,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> EmployeeService for EmployeeServiceImpl<R>
where
    R: Repository<Entity = Employee, NewEntity = NewEmployee>,
{
    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::internal(format!("error finding employee with id {id}"), e))?
            .map(EmployeeResponse::from)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    async fn find_all(&self) -> Result<Vec<EmployeeResponse>, CoreError> {
        let employees = self
            .repo
            .find_all()
            .await
            .map_err(|e| CoreError::internal("error finding employees", e))?;
        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let employees = self
            .repo
            .find_all_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal(format!("error finding employees by ids: {ids:?}"), e))?;
        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    async fn save(&self, employee: NewEmployee) -> Result<DbId, CoreError> {
        self.repo
            .save(&employee)
            .await
            .map_err(|e| {
                insert_error(e, ENTITY, &employee.name, format!("error saving employee name: {}", employee.name))
            })
    }

    async fn create_employee(&self, request: CreateEmployeeRequest) -> Result<DbId, CoreError> {
        let employee = NewEmployee::from(request);
        create_with_unique_name(&self.repo, ENTITY, &employee.name, &employee).await
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| CoreError::internal(format!("error deleting employee by id: {id}"), e))?;
        if !deleted {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }
        tracing::info!(id, "Deleted employee");
        Ok(())
    }

    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, CoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self
            .repo
            .delete_all_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal(format!("error deleting employees by ids: {ids:?}"), e))?;
        tracing::info!(requested = ids.len(), removed, "Deleted employees");
        Ok(removed)
    }
}

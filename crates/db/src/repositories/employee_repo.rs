//! Repository for the `employee` table.

use async_trait::async_trait;
use idm_core::types::DbId;

use crate::models::employee::{Employee, NewEmployee};
use crate::repositories::PgTransaction;
use crate::store::Repository;
use crate::{DbError, DbPool};

const COLUMNS: &str = "id, name, role_id, created_at, updated_at";

const INSERT: &str = "INSERT INTO employee (name, role_id) VALUES ($1, $2) RETURNING id";

/// Request field reported when `role_id` names no role.
const ROLE_REFERENCE: &str = "roleId";

/// Provides CRUD operations for employees.
#[derive(Clone)]
pub struct EmployeeRepo {
    pool: DbPool,
}

impl EmployeeRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for EmployeeRepo {
    type Entity = Employee;
    type NewEntity = NewEmployee;
    type Tx = PgTransaction;

    async fn begin(&self) -> Result<PgTransaction, DbError> {
        PgTransaction::begin(&self.pool).await
    }

    async fn exists_by_name_tx(&self, tx: &mut PgTransaction, name: &str) -> Result<bool, DbError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employee WHERE name = $1)")
                .bind(name)
                .fetch_one(tx.conn())
                .await?;
        Ok(exists)
    }

    async fn save_tx(&self, tx: &mut PgTransaction, entity: &NewEmployee) -> Result<DbId, DbError> {
        let id = sqlx::query_scalar::<_, DbId>(INSERT)
            .bind(&entity.name)
            .bind(entity.role_id)
            .fetch_one(tx.conn())
            .await
            .map_err(|e| DbError::with_reference(e, ROLE_REFERENCE))?;
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Employee>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = $1");
        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM employee ORDER BY id ASC");
        let employees = sqlx::query_as::<_, Employee>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<Employee>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = ANY($1) ORDER BY id ASC");
        let employees = sqlx::query_as::<_, Employee>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn save(&self, entity: &NewEmployee) -> Result<DbId, DbError> {
        let id = sqlx::query_scalar::<_, DbId>(INSERT)
            .bind(&entity.name)
            .bind(entity.role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::with_reference(e, ROLE_REFERENCE))?;
        Ok(id)
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM employee WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, DbError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM employee WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

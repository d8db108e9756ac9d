//! Repository for the `role` table.

use async_trait::async_trait;
use idm_core::types::DbId;

use crate::models::role::{NewRole, Role};
use crate::repositories::PgTransaction;
use crate::store::Repository;
use crate::{DbError, DbPool};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for roles.
#[derive(Clone)]
pub struct RoleRepo {
    pool: DbPool,
}

impl RoleRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for RoleRepo {
    type Entity = Role;
    type NewEntity = NewRole;
    type Tx = PgTransaction;

    async fn begin(&self) -> Result<PgTransaction, DbError> {
        PgTransaction::begin(&self.pool).await
    }

    async fn exists_by_name_tx(&self, tx: &mut PgTransaction, name: &str) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM role WHERE name = $1)")
            .bind(name)
            .fetch_one(tx.conn())
            .await?;
        Ok(exists)
    }

    async fn save_tx(&self, tx: &mut PgTransaction, entity: &NewRole) -> Result<DbId, DbError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO role (name) VALUES ($1) RETURNING id")
            .bind(&entity.name)
            .fetch_one(tx.conn())
            .await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Role>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = $1");
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn find_all(&self) -> Result<Vec<Role>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM role ORDER BY id ASC");
        let roles = sqlx::query_as::<_, Role>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM role WHERE id = ANY($1) ORDER BY id ASC");
        let roles = sqlx::query_as::<_, Role>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    async fn save(&self, entity: &NewRole) -> Result<DbId, DbError> {
        let id = sqlx::query_scalar::<_, DbId>("INSERT INTO role (name) VALUES ($1) RETURNING id")
            .bind(&entity.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM role WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, DbError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM role WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

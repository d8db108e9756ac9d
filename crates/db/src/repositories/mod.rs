//! PostgreSQL implementations of [`Repository`](crate::store::Repository).
//!
//! Each repository holds a clone of the pool and builds its queries from a
//! shared column list.

pub mod employee_repo;
pub mod role_repo;

pub use employee_repo::EmployeeRepo;
pub use role_repo::RoleRepo;

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres};

use crate::store::Transaction;
use crate::{DbError, DbPool};

/// A PostgreSQL transaction checked out of the pool.
///
/// Dropped handles are rolled back by sqlx when the connection returns to
/// the pool.
pub struct PgTransaction(sqlx::Transaction<'static, Postgres>);

impl PgTransaction {
    pub(crate) async fn begin(pool: &DbPool) -> Result<Self, DbError> {
        Ok(Self(pool.begin().await?))
    }

    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self) -> Result<(), DbError> {
        self.0.commit().await.map_err(DbError::from)
    }

    async fn rollback(self) -> Result<(), DbError> {
        self.0.rollback().await.map_err(DbError::from)
    }
}

//! Gateway traits consumed by the service layer.
//!
//! A [`Repository`] exposes plain reads and writes plus the two operations
//! the create workflow runs inside a scoped [`Transaction`]. Transactions are
//! consumed by `commit` or `rollback`, so each handle ends exactly once.
//! Dropping a handle without ending it rolls back.

use async_trait::async_trait;
use idm_core::types::DbId;

use crate::DbError;

/// A unit of work opened by [`Repository::begin`].
#[async_trait]
pub trait Transaction: Send {
    async fn commit(self) -> Result<(), DbError>;

    async fn rollback(self) -> Result<(), DbError>;
}

/// Storage for one entity type whose rows carry a name.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Row type returned by reads.
    type Entity: Send;
    /// Insert DTO.
    type NewEntity: Send + Sync;
    type Tx: Transaction;

    async fn begin(&self) -> Result<Self::Tx, DbError>;

    /// Whether a row named `name` is visible to `tx`.
    async fn exists_by_name_tx(&self, tx: &mut Self::Tx, name: &str) -> Result<bool, DbError>;

    /// Insert inside `tx` and return the generated id.
    async fn save_tx(&self, tx: &mut Self::Tx, entity: &Self::NewEntity) -> Result<DbId, DbError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Self::Entity>, DbError>;

    async fn find_all(&self) -> Result<Vec<Self::Entity>, DbError>;

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<Self::Entity>, DbError>;

    async fn save(&self, entity: &Self::NewEntity) -> Result<DbId, DbError>;

    /// Returns `false` when no row had the given id.
    async fn delete(&self, id: DbId) -> Result<bool, DbError>;

    /// Returns the number of rows removed.
    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, DbError>;
}

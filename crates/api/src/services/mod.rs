//! Business workflows between the handlers and the persistence gateway.
//!
//! Handlers depend on the object-safe [`RoleService`] and
//! [`EmployeeService`] traits; the implementations are generic over an
//! [`idm_db::store::Repository`] so the same workflow runs on PostgreSQL and
//! on the in-memory store.

pub mod employee;
pub mod info;
pub mod role;

pub use employee::{EmployeeService, EmployeeServiceImpl};
pub use info::{ConnectionCheck, FixedConnectionCheck, PgConnectionCheck};
pub use role::{RoleService, RoleServiceImpl};

use std::fmt::Display;

use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_core::validation::FieldErrors;
use idm_db::store::{Repository, Transaction};
use idm_db::DbError;

/// Insert `new_entity` unless a row named `name` already exists, atomically.
///
/// The existence check and the insert run in one transaction. Once the
/// transaction is open exactly one of commit or rollback runs: commit when
/// the insert succeeded, rollback on every other path. A failed rollback is
/// logged and the original error is returned.
///
/// Two concurrent calls can both pass the existence check; the store's
/// unique constraint then rejects the later insert, which is reported as
/// [`CoreError::AlreadyExists`] like any other duplicate.
pub async fn create_with_unique_name<R: Repository>(
    repo: &R,
    entity: &'static str,
    name: &str,
    new_entity: &R::NewEntity,
) -> Result<DbId, CoreError> {
    let mut tx = repo
        .begin()
        .await
        .map_err(|e| CoreError::internal("error creating transaction", e))?;

    match insert_if_absent(repo, &mut tx, entity, name, new_entity).await {
        Ok(id) => {
            tx.commit()
                .await
                .map_err(|e| CoreError::internal("error committing transaction", e))?;
            tracing::info!(entity, id, name, "Created entity");
            Ok(id)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(entity, error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}

async fn insert_if_absent<R: Repository>(
    repo: &R,
    tx: &mut R::Tx,
    entity: &'static str,
    name: &str,
    new_entity: &R::NewEntity,
) -> Result<DbId, CoreError> {
    let exists = repo
        .exists_by_name_tx(tx, name)
        .await
        .map_err(|e| CoreError::internal(format!("error finding {entity} by name: {name}"), e))?;

    if exists {
        tracing::debug!(entity, name, "Rejected duplicate name");
        return Err(CoreError::AlreadyExists {
            entity,
            name: name.to_string(),
        });
    }

    repo.save_tx(tx, new_entity).await.map_err(|e| {
        insert_error(e, entity, name, format!("error creating {entity} with name: {name}"))
    })
}

/// Map a failed insert of `name` to the client error it stands for, or to
/// [`CoreError::Internal`] with `context`.
pub(crate) fn insert_error(
    err: DbError,
    entity: &'static str,
    name: &str,
    context: impl Display,
) -> CoreError {
    match err {
        DbError::UniqueViolation { constraint } => {
            tracing::debug!(entity, name, %constraint, "Insert hit unique constraint");
            CoreError::AlreadyExists {
                entity,
                name: name.to_string(),
            }
        }
        DbError::MissingReference { field, .. } => {
            let mut report = FieldErrors::new();
            report.insert(field, "does not exist");
            CoreError::Validation(report)
        }
        other => CoreError::internal(context, other),
    }
}

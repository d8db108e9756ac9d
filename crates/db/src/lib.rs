//! Persistence gateway for roles and employees.
//!
//! [`store`] defines the repository and transaction traits the services
//! consume; [`repositories`] implements them on PostgreSQL and [`memory`]
//! implements them in-process.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// PostgreSQL SQLSTATE for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for a foreign key violation.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Raw failure reported by a store. Services wrap these with context.
///
/// Constraint violations the caller can act on get their own variants;
/// everything else stays opaque.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("duplicate value violates unique constraint {constraint}")]
    UniqueViolation { constraint: String },

    /// The write referenced a row that does not exist. `field` is the
    /// request field that carried the reference.
    #[error("{field} references a missing row (constraint {constraint})")]
    MissingReference {
        field: &'static str,
        constraint: String,
    },

    /// Failure raised by a non-SQL backend.
    #[error("{0}")]
    Backend(String),
}

impl DbError {
    /// Classify `err`, attributing a foreign key violation to `field`.
    pub fn with_reference(err: sqlx::Error, field: &'static str) -> Self {
        match violated_constraint(&err, FOREIGN_KEY_VIOLATION) {
            Some(constraint) => DbError::MissingReference { field, constraint },
            None => DbError::from(err),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match violated_constraint(&err, UNIQUE_VIOLATION) {
            Some(constraint) => DbError::UniqueViolation { constraint },
            None => DbError::Sqlx(err),
        }
    }
}

/// Name of the violated constraint when `err` carries SQLSTATE `code`.
fn violated_constraint(err: &sqlx::Error, code: &str) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(code) => {
            Some(db_err.constraint().unwrap_or("unknown").to_string())
        }
        _ => None,
    }
}

/// Connection pool bounds.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Connections older than this are closed and replaced.
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            max_lifetime: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_constraint_errors_stay_opaque() {
        assert_matches!(DbError::from(sqlx::Error::RowNotFound), DbError::Sqlx(_));
        assert_matches!(
            DbError::with_reference(sqlx::Error::PoolTimedOut, "roleId"),
            DbError::Sqlx(_)
        );
    }

    #[test]
    fn missing_reference_names_the_field() {
        let err = DbError::MissingReference {
            field: "roleId",
            constraint: "employee_role_id_fkey".into(),
        };
        assert_eq!(
            err.to_string(),
            "roleId references a missing row (constraint employee_role_id_fkey)"
        );
    }
}

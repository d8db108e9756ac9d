//! Database reachability probe behind `/internal/health`.

use async_trait::async_trait;
use idm_db::DbPool;

#[async_trait]
pub trait ConnectionCheck: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Pings PostgreSQL with `SELECT 1`.
pub struct PgConnectionCheck {
    pool: DbPool,
}

impl PgConnectionCheck {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionCheck for PgConnectionCheck {
    async fn is_reachable(&self) -> bool {
        match idm_db::health_check(&self.pool).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Database health check failed");
                false
            }
        }
    }
}

/// Reports a fixed answer; used with the in-memory store.
pub struct FixedConnectionCheck(pub bool);

#[async_trait]
impl ConnectionCheck for FixedConnectionCheck {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

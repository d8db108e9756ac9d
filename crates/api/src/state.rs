use std::sync::Arc;

use idm_db::memory::{MemoryEmployeeRepo, MemoryRoleRepo};
use idm_db::repositories::{EmployeeRepo, RoleRepo};
use idm_db::DbPool;

use crate::config::ServerConfig;
use crate::services::{
    ConnectionCheck, EmployeeService, EmployeeServiceImpl, FixedConnectionCheck,
    PgConnectionCheck, RoleService, RoleServiceImpl,
};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (bind address, timeouts, info metadata).
    pub config: Arc<ServerConfig>,
    pub roles: Arc<dyn RoleService>,
    pub employees: Arc<dyn EmployeeService>,
    /// Database probe for `/internal/health`.
    pub connection: Arc<dyn ConnectionCheck>,
}

impl AppState {
    /// Wire the PostgreSQL repositories around `pool`.
    pub fn from_pool(pool: DbPool, config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            roles: Arc::new(RoleServiceImpl::new(RoleRepo::new(pool.clone()))),
            employees: Arc::new(EmployeeServiceImpl::new(EmployeeRepo::new(pool.clone()))),
            connection: Arc::new(PgConnectionCheck::new(pool)),
        }
    }

    /// Wire services over the given in-memory repositories.
    pub fn in_memory(
        config: ServerConfig,
        roles: MemoryRoleRepo,
        employees: MemoryEmployeeRepo,
    ) -> Self {
        Self {
            config: Arc::new(config),
            roles: Arc::new(RoleServiceImpl::new(roles)),
            employees: Arc::new(EmployeeServiceImpl::new(employees)),
            connection: Arc::new(FixedConnectionCheck(true)),
        }
    }
}

//! Role service: reads, deletes and the unique-name create workflow.

use async_trait::async_trait;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_db::models::role::{CreateRoleRequest, NewRole, Role, RoleResponse};
use idm_db::store::Repository;

use super::{create_with_unique_name, insert_error};

const ENTITY: &str = "role";

#[async_trait]
pub trait RoleService: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError>;

    async fn find_all(&self) -> Result<Vec<RoleResponse>, CoreError>;

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError>;

    /// Plain insert without the uniqueness check.
    async fn save(&self, role: NewRole) -> Result<DbId, CoreError>;

    /// Insert a validated request if no role has the same name.
    async fn create_role(&self, request: CreateRoleRequest) -> Result<DbId, CoreError>;

    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Returns the number of roles removed.
    async fn delete_all_by_ids(&self, ids: &[DbId]) -> Result<u64, CoreError>;
}

/// [`RoleService`] backed by any role [`Repository`].
pub struct RoleServiceImpl<R> {
    repo: R,
}

impl<R> RoleServiceImpl<R>
where
    R: Repository<Entity = Role, NewEntity = NewRole>,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> RoleService for RoleServiceImpl<R>
where
    R: Repository<Entity = Role, NewEntity = NewRole>,
{
    async fn find_by_id(&self, id: DbId) -> Result<RoleResponse, CoreError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::internal(format!("error finding role with id {id}"), e))?
            .map(RoleResponse::from)
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    async fn find_all(&self) -> Result<Vec<RoleResponse>, CoreError> {
        let roles = self
            .repo
            .find_all()
            .await
            .map_err(|e| CoreError::internal("error finding roles", e))?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    async fn find_all_by_ids(&self, ids: &[DbId]) -> Result<Vec<RoleResponse>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let roles = self
            .repo
            .find_all_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal(format!("error finding roles by ids: {ids:?}"), e))?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    async fn save(&self, role: NewRole) -> Result<DbId, CoreError> {
        self.repo
            .save(&role)
            .await
            .map_err(|e| {
                insert_error(e, ENTITY, &role.name, format!("error saving role name: {}", role.name))
            })
    }

    async fn create_role(&self, request: CreateRoleRequest) -> Result<DbId, CoreError> {
        let role = NewRole::from(request);
        create_with_unique_name(&self.repo, ENTITY, &role.name, &role).await
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| CoreError::internal(format!("error deleting role by id: {id}"), e))?;
        if !deleted {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }
        tracing::info!(id, "Deleted role");
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
            .map_err(|e| CoreError::internal(format!("error deleting roles by ids: {ids:?}"), e))?;
        tracing::info!(requested = ids.len(), removed, "Deleted roles");
        Ok(removed)
    }
}

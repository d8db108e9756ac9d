use std::fmt::Display;

use crate::types::DbId;
use crate::validation::FieldErrors;

/// Domain error taxonomy shared by services and handlers.
///
/// Services classify every store failure into one of these variants; the
/// HTTP layer only decides which status code each variant maps to.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// One or more request fields failed validation.
    #[error("{0}")]
    Validation(FieldErrors),

    /// An entity with the same unique name already exists.
    #[error("{entity} with name '{name}' already exists")]
    AlreadyExists { entity: &'static str, name: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Unexpected persistence or transaction failure, wrapped with the
    /// operation that was running.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::Internal`] as `"<context>: <cause>"`.
    pub fn internal(context: impl Display, cause: impl Display) -> Self {
        CoreError::Internal(format!("{context}: {cause}"))
    }

    /// Whether the failure was caused by the caller rather than the system.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::Internal(_))
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors)
    }
}

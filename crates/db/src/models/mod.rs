//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - An insert DTO consumed by the repositories
//! - A `Deserialize` + `Validate` create request decoded from HTTP payloads
//! - A `Serialize` response projection

pub mod employee;
pub mod role;

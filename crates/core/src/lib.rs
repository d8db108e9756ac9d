//! Domain types shared by the persistence and HTTP layers: identifiers,
//! the error taxonomy and request validation.

pub mod error;
pub mod types;
pub mod validation;

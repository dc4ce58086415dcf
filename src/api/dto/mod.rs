//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies reuse the domain input types (`NewElement`, ...); this
//! module holds the response wrappers and query parameters.

pub mod common_dto;
pub mod record_dto;

pub use common_dto::*;
pub use record_dto::*;

//! Core types for Washboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod pagination;
pub mod phone;
pub mod schema;
pub mod status;
pub mod store_id;

pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::{OrderBy, Page, Pagination, PaginationError};
pub use phone::{Phone, PhoneError};
pub use schema::{SchemaName, SchemaNameError};
pub use status::*;
pub use store_id::{StoreId, StoreIdError};

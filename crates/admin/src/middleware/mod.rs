//! Request middleware and extractors.

pub mod tenant;

pub use tenant::{TENANT_SCHEMA_HEADER, Tenant};

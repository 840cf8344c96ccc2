//! Washboard Core - Shared types library.
//!
//! This crate provides common types used across all Washboard components:
//! - `admin` - Multi-tenant administrative backend
//! - `cli` - Command-line tools for migrations and tenant management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phone numbers,
//!   tenant schema names, sortable store identifiers, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

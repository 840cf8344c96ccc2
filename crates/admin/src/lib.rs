//! Washboard Admin library.
//!
//! This crate provides the administrative backend as a library, allowing it
//! to be tested and reused by the CLI.
//!
//! # Multi-tenancy
//!
//! Every tenant owns a `PostgreSQL` schema. A request is bound to exactly
//! one tenant's schema for its whole unit of work; see [`db::tenancy`] for
//! the schema router and session contract.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

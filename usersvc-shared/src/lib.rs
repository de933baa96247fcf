//! # usersvc shared library
//!
//! Storage layer used by the `usersvc-api` HTTP server.
//!
//! ## Module Organization
//!
//! - `db`: connection settings and scoped per-request connections
//! - `models`: the `User` row type and its SQL operations

pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # tasklet-store
//!
//! Local task cache on `SQLite`.
//!
//! - [`connection`]: `r2d2` pool with per-connection pragmas
//! - [`migrations`]: embedded, versioned schema migrations
//! - [`dao`]: the [`TaskDao`] contract and [`SqliteTaskStore`]
//!
//! The store is a cache of what the task API last returned. It never assigns
//! ids and never decides what a task should look like.

#![deny(unsafe_code)]

pub mod connection;
pub mod dao;
pub mod entity;
pub mod errors;
pub mod migrations;

pub use connection::{ConnectionConfig, ConnectionPool};
pub use dao::{SqliteTaskStore, TaskDao};
pub use entity::TaskEntity;
pub use errors::{Result, StoreError};

//! # tasklet-core
//!
//! Foundation types shared by every Tasklet crate:
//!
//! - **Domain model**: [`Task`] plus the [`CreateTaskRequest`] and
//!   [`UpdateTaskRequest`] shapes sent to the task API
//! - **Errors**: [`TaskError`], the single opaque failure returned by the
//!   repository layer
//! - **Due dates**: [`due`] helpers for the `YYYY-MM-DDTHH:mm` due-date strings
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` stderr subscriber

#![deny(unsafe_code)]

pub mod due;
pub mod errors;
pub mod logging;
pub mod model;

pub use errors::{TaskError, TaskResult};
pub use model::{CreateTaskRequest, FieldUpdate, Task, TaskId, UpdateTaskRequest};

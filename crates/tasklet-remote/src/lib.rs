//! # tasklet-remote
//!
//! Client for the remote task API.
//!
//! [`TaskService`] is the seam the repository depends on; [`HttpTaskService`]
//! implements it with `reqwest`. Endpoints are resolved relative to the
//! configured base URL:
//!
//! | Method | Path |
//! |---|---|
//! | `GET` | `tasks` |
//! | `GET` | `tasks/{id}` |
//! | `POST` | `tasks` |
//! | `PUT` | `tasks/{id}` |
//! | `DELETE` | `tasks/{id}` |

#![deny(unsafe_code)]

pub mod client;
pub mod dto;
pub mod errors;

pub use client::{ApiResponse, HttpTaskService, TaskService};
pub use dto::TaskResponse;
pub use errors::{RemoteError, Result};

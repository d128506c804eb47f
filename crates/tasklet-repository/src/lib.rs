//! # tasklet-repository
//!
//! The single source of task data for front-ends. [`TaskRepository`] reads
//! from the local cache first and sends every mutation to the task API,
//! caching only what the API returns. Each operation resolves to a value or
//! a [`tasklet_core::TaskError`].

#![deny(unsafe_code)]

pub mod mappers;
pub mod repository;

pub use repository::TaskRepository;

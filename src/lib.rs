//! todo-service - a small HTTP CRUD service for todos
//!
//! - PostgreSQL persistence through a shared sqlx pool
//! - JSON over HTTP with axum
//! - Structured logging with tracing and a Prometheus scrape endpoint

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod types;

pub use error::{Error, Result};

//! Storage abstraction layer
//!
//! Provides a unified interface over PostgreSQL and in-memory todo storage

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Todo, TodoId};
use crate::Result;

pub mod memory;
pub mod postgres;

/// Todo persistence trait
///
/// Every call is a single statement. Dropping the returned future aborts the
/// call, so callers bound it with their own deadline.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// List every stored todo in storage-default order
    async fn list_all(&self) -> Result<Vec<Todo>>;

    /// Fetch one todo, `Error::NotFound` when no row matches
    async fn get_by_id(&self, id: TodoId) -> Result<Todo>;

    /// Insert a todo, the id is generated by storage
    async fn create(&self, name: &str) -> Result<Todo>;

    /// Rename an existing todo, `Error::NotFound` when no row matches
    async fn update(&self, id: TodoId, name: &str) -> Result<Todo>;

    /// Delete a todo and return the number of rows removed (0 or 1)
    async fn delete_by_id(&self, id: TodoId) -> Result<u64>;

    /// Create the backing table if it does not exist yet
    async fn ensure_schema(&self) -> Result<()>;

    /// Check that storage is reachable
    async fn ping(&self) -> Result<()>;
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Postgres {
        connect: sqlx::postgres::PgConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    },
    Memory,
}

/// Create storage backend from config
pub async fn create_store(config: StorageConfig) -> Result<Arc<dyn TodoStore>> {
    match config {
        StorageConfig::Postgres {
            connect,
            max_connections,
            acquire_timeout,
        } => {
            let store =
                postgres::PgTodoStore::connect(connect, max_connections, acquire_timeout).await?;
            Ok(Arc::new(store))
        }
        StorageConfig::Memory => Ok(Arc::new(memory::MemoryTodoStore::new())),
    }
}

//! PostgreSQL storage backend

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::instrument;

use crate::types::{Todo, TodoId};
use crate::{Error, Result};

use super::TodoStore;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todo (
        id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
        name TEXT NOT NULL
    )
"#;

/// PostgreSQL-backed todo storage over a shared connection pool
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Open a pool and verify the database is reachable.
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_todo(row: &PgRow) -> Result<Todo> {
    Ok(Todo {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl TodoStore for PgTodoStore {
    #[instrument(name = "db.list_all", skip(self), err)]
    async fn list_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, name FROM todo")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_todo).collect()
    }

    #[instrument(name = "db.get_by_id", skip(self), fields(todo.id = %id))]
    async fn get_by_id(&self, id: TodoId) -> Result<Todo> {
        let row = sqlx::query("SELECT id, name FROM todo WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row_to_todo(&row),
            None => Err(Error::NotFound(id)),
        }
    }

    #[instrument(name = "db.create", skip(self, name), err)]
    async fn create(&self, name: &str) -> Result<Todo> {
        let row = sqlx::query("INSERT INTO todo (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        row_to_todo(&row)
    }

    #[instrument(name = "db.update", skip(self, name), fields(todo.id = %id))]
    async fn update(&self, id: TodoId, name: &str) -> Result<Todo> {
        let row = sqlx::query("UPDATE todo SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row_to_todo(&row),
            None => Err(Error::NotFound(id)),
        }
    }

    #[instrument(name = "db.delete_by_id", skip(self), fields(todo.id = %id), err)]
    async fn delete_by_id(&self, id: TodoId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::info!("Database schema initialised");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

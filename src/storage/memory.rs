//! In-memory storage backend

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::types::{Todo, TodoId};
use crate::{Error, Result};

use super::TodoStore;

/// Process-local todo storage, contents are lost on restart
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: DashMap<TodoId, Todo>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn get_by_id(&self, id: TodoId) -> Result<Todo> {
        self.todos
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::NotFound(id))
    }

    async fn create(&self, name: &str) -> Result<Todo> {
        let todo = Todo {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, name: &str) -> Result<Todo> {
        let mut entry = self.todos.get_mut(&id).ok_or(Error::NotFound(id))?;
        entry.name = name.to_string();
        Ok(entry.clone())
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<u64> {
        Ok(self.todos.remove(&id).map_or(0, |_| 1))
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

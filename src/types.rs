//! Core types for the todo service

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Todo ID type, assigned by storage on insert
pub type TodoId = Uuid;

/// A single stored todo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
}

/// Request body accepted by create and update.
///
/// Any `id` sent by the client is ignored: ids are only ever assigned by storage.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoPayload {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_id_as_string() {
        let todo = Todo {
            id: Uuid::nil(),
            name: "buy milk".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "buy milk");
    }

    #[test]
    fn payload_ignores_client_supplied_id() {
        let payload: TodoPayload =
            serde_json::from_str(r#"{"id":"abc","name":"buy bread"}"#).unwrap();
        assert_eq!(payload.name, "buy bread");
    }

    #[test]
    fn payload_requires_name() {
        let result: Result<TodoPayload, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }
}

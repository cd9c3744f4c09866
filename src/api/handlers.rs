//! API handlers

use std::future::Future;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::api::AppState;
use crate::telemetry::record_request;
use crate::types::{TodoId, TodoPayload};
use crate::{Error, Result as StoreResult};

const NOT_FOUND: &str = "Todo not found";
const INVALID_PAYLOAD: &str = "Invalid request payload";

/// List every todo
#[instrument(name = "AllTodos", skip(state))]
pub async fn list_todos(State(state): State<AppState>) -> Response {
    const ROUTE: &str = "list_todos";
    let started = Instant::now();

    let result = match bounded(&state, state.store.list_all()).await {
        Ok(todos) => {
            tracing::info!(count = todos.len(), "Listed todos");
            Ok(Json(todos).into_response())
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to fetch todos");
            Err(ApiError::internal("Failed to fetch todos"))
        }
    };

    finish(ROUTE, started, result)
}

/// Fetch one todo by id. Any failure answers 404.
#[instrument(name = "GetTodo", skip(state))]
pub async fn get_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    const ROUTE: &str = "get_todo";
    let started = Instant::now();

    let result = match parse_id(&id) {
        None => {
            tracing::warn!(%id, "Todo not found: malformed id");
            Err(ApiError::not_found())
        }
        Some(todo_id) => match bounded(&state, state.store.get_by_id(todo_id)).await {
            Ok(todo) => Ok(Json(todo).into_response()),
            Err(Error::NotFound(_)) => {
                tracing::warn!(%id, "Todo not found");
                Err(ApiError::not_found())
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "Failed to fetch todo");
                Err(ApiError::not_found())
            }
        },
    };

    finish(ROUTE, started, result)
}

/// Create a todo, the id is assigned by storage
#[instrument(name = "CreateTodo", skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "create_todo";
    let started = Instant::now();

    let result = match decode(payload) {
        Err(err) => Err(err),
        Ok(payload) => match bounded(&state, state.store.create(&payload.name)).await {
            Ok(todo) => {
                tracing::info!(id = %todo.id, "Created todo");
                Ok((StatusCode::CREATED, Json(todo)).into_response())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to create todo");
                Err(ApiError::internal("Failed to create todo"))
            }
        },
    };

    finish(ROUTE, started, result)
}

/// Rename an existing todo
#[instrument(name = "UpdateTodo", skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "update_todo";
    let started = Instant::now();

    let result = match decode(payload) {
        Err(err) => Err(err),
        Ok(payload) => match parse_id(&id) {
            None => {
                tracing::warn!(%id, "Failed to update todo: malformed id");
                Err(ApiError::not_found())
            }
            Some(todo_id) => {
                match bounded(&state, state.store.update(todo_id, &payload.name)).await {
                    Ok(todo) => {
                        tracing::info!(%id, name = %todo.name, "Updated todo");
                        Ok(Json(todo).into_response())
                    }
                    Err(Error::NotFound(_)) => {
                        tracing::warn!(%id, "Failed to update todo: not found");
                        Err(ApiError::not_found())
                    }
                    Err(err) => {
                        tracing::error!(%id, error = %err, "Failed to update todo");
                        Err(ApiError::internal("Failed to update todo"))
                    }
                }
            }
        },
    };

    finish(ROUTE, started, result)
}

/// Delete a todo. Unknown ids and storage failures both answer 404.
#[instrument(name = "DeleteTodo", skip(state))]
pub async fn delete_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    const ROUTE: &str = "delete_todo";
    let started = Instant::now();

    let result = match parse_id(&id) {
        None => {
            tracing::warn!(%id, "Failed to delete todo: malformed id");
            Err(ApiError::not_found())
        }
        Some(todo_id) => match bounded(&state, state.store.delete_by_id(todo_id)).await {
            Ok(0) => {
                tracing::warn!(%id, "Failed to delete todo: not found");
                Err(ApiError::not_found())
            }
            Ok(_) => {
                tracing::info!(%id, "Deleted todo");
                Ok(StatusCode::NO_CONTENT.into_response())
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "Failed to delete todo");
                Err(ApiError::not_found())
            }
        },
    };

    finish(ROUTE, started, result)
}

/// Prometheus scrape endpoint
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

/// Health check including storage reachability
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match bounded(&state, state.store.ping()).await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Ids that are not UUIDs can never match a stored row.
fn parse_id(raw: &str) -> Option<TodoId> {
    Uuid::parse_str(raw).ok()
}

fn decode(payload: Result<Json<TodoPayload>, JsonRejection>) -> Result<TodoPayload, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            let err = Error::invalid_request(rejection.body_text());
            tracing::warn!(error = %err, "Invalid JSON payload");
            Err(ApiError::bad_request(INVALID_PAYLOAD))
        }
    }
}

/// Run a storage call under the request deadline.
async fn bounded<T>(
    state: &AppState,
    call: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    tokio::time::timeout(state.request_timeout, call)
        .await
        .map_err(|_| Error::Timeout(state.request_timeout))?
}

fn finish(route: &'static str, started: Instant, result: Result<Response, ApiError>) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    record_request(route, response.status(), started);
    response
}

/// Client-facing failure: a status and a short plain-text message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: NOT_FOUND.to_string(),
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

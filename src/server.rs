use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db;
use crate::error::ApiError;
use crate::models::Task;

pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(list).post(create).patch(update).delete(remove),
        )
        .with_state(pool)
}

pub async fn run(pool: SqlitePool, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(pool)).await?;
    Ok(())
}

// GET /api/todos
async fn list(State(pool): State<SqlitePool>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = db::list_all(&pool).await?;
    Ok(Json(tasks))
}

// POST /api/todos
async fn create(
    State(pool): State<SqlitePool>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let content = body
        .as_ref()
        .and_then(|Json(body)| body.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if content.is_empty() {
        return Err(ApiError::Validation("Missing content"));
    }

    let task = db::insert(&pool, content).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

// PATCH /api/todos
async fn update(
    State(pool): State<SqlitePool>,
    body: Option<Json<Value>>,
) -> Result<Json<Task>, ApiError> {
    let body = body.as_ref().map(|Json(body)| body);
    let id = parse_id(body)?;
    let completed = parse_completed(body);

    let task = db::update_completed(&pool, id, completed)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(task))
}

// DELETE /api/todos
async fn remove(
    State(pool): State<SqlitePool>,
    body: Option<Json<Value>>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(body.as_ref().map(|Json(body)| body))?;

    let task = db::delete(&pool, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(task))
}

/// `id` must be a finite positive number; numeric strings count, the way
/// `Number(...)` treats them. A positive non-integral value is accepted here
/// but can never match an integer primary key, so it falls through to the
/// not-found path.
fn parse_id(body: Option<&Value>) -> Result<i64, ApiError> {
    let id = body
        .and_then(|body| body.get("id"))
        .and_then(|id| match id {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => id.as_f64(),
        })
        .filter(|id| id.is_finite() && *id > 0.0)
        .ok_or(ApiError::Validation("Invalid id"))?;
    if id.fract() != 0.0 || id > i64::MAX as f64 {
        return Err(ApiError::NotFound);
    }
    Ok(id as i64)
}

/// `completed` is coerced to a boolean: false, 0, "", null, and absent are
/// false, everything else is true.
fn parse_completed(body: Option<&Value>) -> bool {
    match body.and_then(|body| body.get("completed")) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(completed)) => *completed,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

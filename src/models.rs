use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Task struct, mirrored by the `todos` table
#[derive(Clone, Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Read-only reference data selected on the employee forms.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PositionRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

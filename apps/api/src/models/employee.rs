use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: i32,
    pub position_id: Option<Uuid>,
    /// Name the file had on the uploader's machine. Display only.
    pub original_filename: Option<String>,
    /// Opaque blob key basename; never derived from user input.
    pub encrypted_filename: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns for an INSERT; id and timestamps come from the database.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: i32,
    pub position_id: Option<Uuid>,
    pub original_filename: Option<String>,
    pub encrypted_filename: Option<String>,
}

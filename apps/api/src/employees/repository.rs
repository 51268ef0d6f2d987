//! Relational persistence for employees and the positions they reference.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{EmployeeRow, NewEmployee};
use crate::models::position::PositionRow;

/// Carried in `AppState` as `Arc<dyn RecordStore>` so tests can swap in an
/// in-memory store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError>;

    async fn list_positions(&self) -> Result<Vec<PositionRow>, AppError>;

    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError>;

    async fn position_exists(&self, id: Uuid) -> Result<bool, AppError>;

    /// Whether another employee already uses `email`. `except` excludes the
    /// employee being edited.
    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError>;

    async fn insert_employee(&self, employee: NewEmployee) -> Result<EmployeeRow, AppError>;

    /// Writes every mutable column of `employee`. Returns `None` if the row is gone.
    async fn update_employee(&self, employee: &EmployeeRow)
        -> Result<Option<EmployeeRow>, AppError>;

    /// Nulls both filename columns. Returns `None` if the row is gone.
    async fn clear_employee_file(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError>;

    /// Returns whether a row was deleted.
    async fn delete_employee(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError> {
        Ok(
            sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_positions(&self) -> Result<Vec<PositionRow>, AppError> {
        Ok(
            sqlx::query_as::<_, PositionRow>("SELECT * FROM positions ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError> {
        Ok(
            sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn position_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM positions WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<EmployeeRow, AppError> {
        Ok(sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees
                (firstname, lastname, email, age, position_id,
                 original_filename, encrypted_filename)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&employee.firstname)
        .bind(&employee.lastname)
        .bind(&employee.email)
        .bind(employee.age)
        .bind(employee.position_id)
        .bind(&employee.original_filename)
        .bind(&employee.encrypted_filename)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_employee(
        &self,
        employee: &EmployeeRow,
    ) -> Result<Option<EmployeeRow>, AppError> {
        Ok(sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET firstname = $2, lastname = $3, email = $4, age = $5, position_id = $6,
                original_filename = $7, encrypted_filename = $8, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(employee.id)
        .bind(&employee.firstname)
        .bind(&employee.lastname)
        .bind(&employee.email)
        .bind(employee.age)
        .bind(employee.position_id)
        .bind(&employee.original_filename)
        .bind(&employee.encrypted_filename)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn clear_employee_file(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError> {
        Ok(sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET original_filename = NULL, encrypted_filename = NULL, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_employee(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

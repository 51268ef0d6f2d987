//! Axum route handlers for the Employee API.
//!
//! Form-style outcomes ("redirect back with a message") are returned as a
//! JSON `Notice` naming where the client should go next.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::employees::form::EmployeeForm;
use crate::employees::manager::{Download, EditForm};
use crate::errors::AppError;
use crate::models::employee::EmployeeRow;
use crate::models::position::PositionRow;
use crate::state::AppState;

const LIST_PATH: &str = "/employees";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Notice {
    pub status: &'static str,
    pub message: String,
    pub redirect_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeRow>,
}

impl Notice {
    fn success(message: &str, redirect_to: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.to_string(),
            redirect_to: redirect_to.into(),
            employee: None,
        }
    }

    fn error(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            redirect_to: redirect_to.into(),
            employee: None,
        }
    }

    fn with_employee(mut self, employee: EmployeeRow) -> Self {
        self.employee = Some(employee);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<EmployeeRow>,
}

#[derive(Debug, Serialize)]
pub struct CreateFormResponse {
    pub positions: Vec<PositionRow>,
}

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub employee: Option<EmployeeRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /employees
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<EmployeeListResponse>, AppError> {
    let employees = state.employees.list().await?;
    Ok(Json(EmployeeListResponse { employees }))
}

/// GET /employees/create
pub async fn handle_create_form(
    State(state): State<AppState>,
) -> Result<Json<CreateFormResponse>, AppError> {
    let positions = state.employees.create_form().await?;
    Ok(Json(CreateFormResponse { positions }))
}

/// POST /employees (multipart)
pub async fn handle_create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Notice>), AppError> {
    let form = EmployeeForm::from_multipart(multipart).await?;
    let employee = state.employees.create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice::success("Employee data created successfully.", LIST_PATH).with_employee(employee)),
    ))
}

/// GET /employees/:id
///
/// An unknown id renders `{"employee": null}` rather than 404.
pub async fn handle_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShowResponse>, AppError> {
    let employee = state.employees.show(id).await?;
    Ok(Json(ShowResponse { employee }))
}

/// GET /employees/:id/edit
pub async fn handle_edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EditForm>, AppError> {
    Ok(Json(state.employees.edit_form(id).await?))
}

/// POST|PUT /employees/:id (multipart)
///
/// An unknown id becomes an error notice; validation failures keep the
/// `AppError` envelope so the form can be re-displayed.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = EmployeeForm::from_multipart(multipart).await?;
    match state.employees.update(id, form).await {
        Ok(employee) => Ok(Json(
            Notice::success("Employee data updated successfully.", LIST_PATH)
                .with_employee(employee),
        )
        .into_response()),
        Err(e) => error_notice(e, LIST_PATH),
    }
}

/// DELETE /employees/:id, POST /employees/:id/delete
///
/// Every failure is turned into an error notice here; nothing propagates.
pub async fn handle_delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.employees.delete(id).await {
        Ok(()) => Json(Notice::success(
            "Employee data and file deleted successfully.",
            LIST_PATH,
        ))
        .into_response(),
        Err(AppError::NotFound(message)) => {
            (StatusCode::NOT_FOUND, Json(Notice::error(message, LIST_PATH))).into_response()
        }
        Err(e) => {
            tracing::error!("Deleting employee {id} failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Notice::error(
                    format!("An error occurred while deleting: {e}"),
                    LIST_PATH,
                )),
            )
                .into_response()
        }
    }
}

/// GET /employees/:id/download
///
/// 204 with no body when there is no file to send.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match state.employees.download_file(id).await? {
        Some(download) => attachment(download),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /employees/:id/remove-file
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let edit_path = format!("{LIST_PATH}/{id}/edit");
    match state.employees.remove_file(id).await {
        Ok(employee) => Ok(Json(
            Notice::success("CV file deleted successfully.", edit_path).with_employee(employee),
        )
        .into_response()),
        Err(e @ AppError::Conflict(_)) => error_notice(e, edit_path),
        Err(e) => error_notice(e, LIST_PATH),
    }
}

/// Renders a missing employee (404) or a missing file (409) as an error
/// notice sending the client to `redirect_to`. Other errors pass through.
fn error_notice(err: AppError, redirect_to: impl Into<String>) -> Result<Response, AppError> {
    let (status, message) = match err {
        AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        AppError::Conflict(message) => (StatusCode::CONFLICT, message),
        other => return Err(other),
    };
    Ok((status, Json(Notice::error(message, redirect_to))).into_response())
}

fn attachment(download: Download) -> Result<Response, AppError> {
    let content_type = HeaderValue::from_str(&download.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&download.filename))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Bad download filename: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}

/// `attachment; filename="…"` with anything outside printable ASCII, plus
/// quotes and backslashes, replaced by `_`.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;

/// An uploaded résumé as received from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CvUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl CvUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Raw employee form input, before validation. Text fields are trimmed;
/// missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub position: String,
    pub cv: Option<CvUpload>,
}

impl EmployeeForm {
    /// Reads the multipart body field by field. Unknown fields are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = EmployeeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Invalid multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "cv" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read cv", e))?;
                    // Browsers send an empty part when no file was chosen.
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.cv = Some(CvUpload {
                            file_name,
                            content_type,
                            bytes,
                        });
                    }
                }
                "firstName" | "lastName" | "email" | "age" | "position" => {
                    let value = field.text().await.map_err(|e| {
                        multipart_error(&format!("Failed to read field {name}"), e)
                    })?;
                    form.set_text(&name, value.trim().to_string());
                }
                other => {
                    tracing::debug!("Ignoring unexpected form field '{other}'");
                }
            }
        }

        Ok(form)
    }

    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "firstName" => self.first_name = value,
            "lastName" => self.last_name = value,
            "email" => self.email = value,
            "age" => self.age = value,
            "position" => self.position = value,
            _ => {}
        }
    }

    /// The scalar input echoed back with validation errors. File bytes are
    /// never echoed.
    pub fn echo(&self) -> Value {
        json!({
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "age": self.age,
            "position": self.position,
        })
    }
}

/// A body cut off by the request size limit stays a 413; anything else
/// malformed is the client's bad request.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", err.body_text()))
    } else {
        AppError::BadRequest(format!("{context}: {}", err.body_text()))
    }
}

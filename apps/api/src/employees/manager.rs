//! Employee record manager: keeps each employee row and its résumé blob in step.
//!
//! The record store and the blob store are written independently. Nothing
//! here is transactional across the two, so a failure between the blob write
//! and the row write can leave an orphaned blob or a dangling key.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::employees::form::{CvUpload, EmployeeForm};
use crate::employees::repository::RecordStore;
use crate::employees::validation::{validate_create, validate_update};
use crate::errors::AppError;
use crate::models::employee::{EmployeeRow, NewEmployee};
use crate::models::position::PositionRow;
use crate::storage::{content_type_for, file_key, generate_stored_filename, BlobStore};

pub const EMPLOYEE_NOT_FOUND: &str = "Employee data not found.";
pub const NO_FILE_STORED: &str = "No CV file is stored.";

#[derive(Debug, Serialize)]
pub struct EditForm {
    /// `None` when the id does not resolve; the caller decides how to render it.
    pub employee: Option<EmployeeRow>,
    pub positions: Vec<PositionRow>,
}

/// A résumé ready to be sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: String,
}

#[derive(Clone)]
pub struct EmployeeManager {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl EmployeeManager {
    pub fn new(records: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeRow>, AppError> {
        self.records.list_employees().await
    }

    pub async fn create_form(&self) -> Result<Vec<PositionRow>, AppError> {
        self.records.list_positions().await
    }

    pub async fn create(&self, form: EmployeeForm) -> Result<EmployeeRow, AppError> {
        let valid = validate_create(form, self.records.as_ref()).await?;

        let (original_filename, encrypted_filename) = match valid.cv {
            Some(cv) => {
                let (original, stored) = self.store_cv(cv).await?;
                (Some(original), Some(stored))
            }
            None => (None, None),
        };

        let employee = self
            .records
            .insert_employee(NewEmployee {
                firstname: valid.first_name,
                lastname: valid.last_name,
                email: valid.email,
                age: valid.age,
                position_id: valid.position_id,
                original_filename,
                encrypted_filename,
            })
            .await?;

        info!(
            "Created employee {} (file: {:?})",
            employee.id, employee.encrypted_filename
        );
        Ok(employee)
    }

    /// Missing ids yield `Ok(None)`, not an error.
    pub async fn show(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError> {
        self.records.find_employee(id).await
    }

    pub async fn edit_form(&self, id: Uuid) -> Result<EditForm, AppError> {
        let positions = self.records.list_positions().await?;
        let employee = self.records.find_employee(id).await?;
        Ok(EditForm {
            employee,
            positions,
        })
    }

    pub async fn update(&self, id: Uuid, form: EmployeeForm) -> Result<EmployeeRow, AppError> {
        let valid = validate_update(id, form, self.records.as_ref()).await?;

        let mut employee = self
            .records
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

        employee.firstname = valid.first_name;
        employee.lastname = valid.last_name;
        employee.email = valid.email;
        employee.age = valid.age;
        employee.position_id = valid.position_id;

        if let Some(cv) = valid.cv {
            if let Some(previous) = &employee.encrypted_filename {
                self.blobs.delete(&file_key(previous)).await?;
                info!("Deleted previous CV {previous} of employee {id}");
            }
            let (original, stored) = self.store_cv(cv).await?;
            employee.original_filename = Some(original);
            employee.encrypted_filename = Some(stored);
        }

        let employee = self
            .records
            .update_employee(&employee)
            .await?
            .ok_or_else(|| AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

        info!("Updated employee {id}");
        Ok(employee)
    }

    /// Removes the employee and its blob, blob first. A failure after the
    /// blob is gone leaves the row pointing at nothing.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let employee = self
            .records
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

        if let Some(stored) = &employee.encrypted_filename {
            self.delete_blob_if_present(stored).await?;
        }

        if !self.records.delete_employee(id).await? {
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        info!("Deleted employee {id}");
        Ok(())
    }

    /// `Ok(None)` when there is nothing to send: unknown id, no stored file,
    /// or a key whose blob has disappeared.
    ///
    /// The suggested filename always ends in `_cv.pdf`, whatever was uploaded.
    pub async fn download_file(&self, id: Uuid) -> Result<Option<Download>, AppError> {
        let Some(employee) = self.records.find_employee(id).await? else {
            return Ok(None);
        };
        let Some(stored) = &employee.encrypted_filename else {
            return Ok(None);
        };

        let Some(blob) = self.blobs.get(&file_key(stored)).await? else {
            warn!("Employee {id} references missing blob {stored}");
            return Ok(None);
        };

        Ok(Some(Download {
            bytes: blob.bytes,
            content_type: blob.content_type,
            filename: download_filename(&employee),
        }))
    }

    pub async fn remove_file(&self, id: Uuid) -> Result<EmployeeRow, AppError> {
        let employee = self
            .records
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

        info!("Employee before file removal: {employee:?}");

        let Some(stored) = &employee.encrypted_filename else {
            return Err(AppError::Conflict(NO_FILE_STORED.to_string()));
        };
        self.delete_blob_if_present(stored).await?;

        let employee = self
            .records
            .clear_employee_file(id)
            .await?
            .ok_or_else(|| AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()))?;

        info!("Employee after file removal: {employee:?}");
        Ok(employee)
    }

    /// Writes the upload under a fresh opaque key.
    /// Returns `(original filename, stored filename)`.
    async fn store_cv(&self, cv: CvUpload) -> Result<(String, String), AppError> {
        let stored = generate_stored_filename(&cv.file_name);
        let content_type = content_type_for(&cv.file_name, cv.content_type.as_deref());
        self.blobs
            .put(&file_key(&stored), cv.bytes, &content_type)
            .await?;
        info!("Stored CV '{}' as {stored}", cv.file_name);
        Ok((cv.file_name, stored))
    }

    async fn delete_blob_if_present(&self, stored: &str) -> Result<(), AppError> {
        let key = file_key(stored);
        if self.blobs.exists(&key).await? {
            self.blobs.delete(&key).await?;
            info!("Deleted blob {key}");
        } else {
            warn!("Blob {key} already absent");
        }
        Ok(())
    }
}

/// `<first>_<last>_cv.pdf`, lowercased.
pub fn download_filename(employee: &EmployeeRow) -> String {
    format!("{}_{}_cv.pdf", employee.firstname, employee.lastname).to_lowercase()
}

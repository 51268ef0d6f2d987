//! In-memory record and blob stores for unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::employees::repository::RecordStore;
use crate::errors::AppError;
use crate::models::employee::{EmployeeRow, NewEmployee};
use crate::models::position::PositionRow;
use crate::storage::{BlobStore, StoredBlob};

#[derive(Default)]
pub struct MemoryRecordStore {
    employees: Mutex<Vec<EmployeeRow>>,
    positions: Mutex<Vec<PositionRow>>,
    pub fail_deletes: AtomicBool,
}

impl MemoryRecordStore {
    pub fn add_position(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.positions.lock().unwrap().push(PositionRow {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    /// Inserts an employee directly, bypassing validation.
    pub fn seed_employee(&self, email: &str, stored_filename: Option<&str>) -> EmployeeRow {
        let now = Utc::now();
        let row = EmployeeRow {
            id: Uuid::new_v4(),
            firstname: "Seed".to_string(),
            lastname: "Employee".to_string(),
            email: email.to_string(),
            age: 40,
            position_id: None,
            original_filename: stored_filename.map(|_| "cv.pdf".to_string()),
            encrypted_filename: stored_filename.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.employees.lock().unwrap().push(row.clone());
        row
    }

    pub fn get(&self, id: Uuid) -> Option<EmployeeRow> {
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.employees.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError> {
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn list_positions(&self) -> Result<Vec<PositionRow>, AppError> {
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError> {
        Ok(self.get(id))
    }

    async fn position_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.positions.lock().unwrap().iter().any(|p| p.id == id))
    }

    async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.email == email && Some(e.id) != except))
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<EmployeeRow, AppError> {
        let mut employees = self.employees.lock().unwrap();
        if employees.iter().any(|e| e.email == employee.email) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "duplicate key value violates unique constraint \"employees_email_key\""
            )));
        }
        let now = Utc::now();
        let row = EmployeeRow {
            id: Uuid::new_v4(),
            firstname: employee.firstname,
            lastname: employee.lastname,
            email: employee.email,
            age: employee.age,
            position_id: employee.position_id,
            original_filename: employee.original_filename,
            encrypted_filename: employee.encrypted_filename,
            created_at: now,
            updated_at: now,
        };
        employees.push(row.clone());
        Ok(row)
    }

    async fn update_employee(
        &self,
        employee: &EmployeeRow,
    ) -> Result<Option<EmployeeRow>, AppError> {
        let mut employees = self.employees.lock().unwrap();
        let Some(slot) = employees.iter_mut().find(|e| e.id == employee.id) else {
            return Ok(None);
        };
        *slot = EmployeeRow {
            updated_at: Utc::now(),
            ..employee.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn clear_employee_file(&self, id: Uuid) -> Result<Option<EmployeeRow>, AppError> {
        let mut employees = self.employees.lock().unwrap();
        let Some(slot) = employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        slot.original_filename = None;
        slot.encrypted_filename = None;
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }

    async fn delete_employee(&self, id: Uuid) -> Result<bool, AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("connection reset")));
        }
        let mut employees = self.employees.lock().unwrap();
        let before = employees.len();
        employees.retain(|e| e.id != id);
        Ok(employees.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    pub fail_deletes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn insert(&self, key: &str, bytes: &'static [u8]) {
        self.blobs.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                bytes: Bytes::from_static(bytes),
                content_type: "application/pdf".to_string(),
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.blobs.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.contains(key))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("delete of {key} refused")));
        }
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, AppError> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }
}

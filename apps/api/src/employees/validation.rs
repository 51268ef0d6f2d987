//! Up-front validation of employee form input.
//!
//! Create and update deliberately apply different rules:
//! - create requires a cv but does not check its type or size, and takes the
//!   position as given;
//! - update accepts a missing cv but restricts type and size when one is
//!   sent, and requires a position that exists.
//!
//! Every failing field is reported; validation never stops at the first error.

use uuid::Uuid;
use validator::ValidateEmail;

use crate::employees::form::{CvUpload, EmployeeForm};
use crate::employees::repository::RecordStore;
use crate::errors::{AppError, ValidationErrors};
use crate::storage::extension_of;

pub const CV_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// 2048 KB.
pub const CV_MAX_BYTES: usize = 2048 * 1024;

/// Input that passed validation and may be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub position_id: Option<Uuid>,
    pub cv: Option<CvUpload>,
}

pub async fn validate_create(
    form: EmployeeForm,
    records: &dyn RecordStore,
) -> Result<ValidEmployee, AppError> {
    let mut errors = ValidationErrors::default();

    check_names(&form, &mut errors);
    let age = check_age(&form, &mut errors);
    check_email(&form, None, records, &mut errors).await?;

    // A present but unparseable position is stored as no position.
    let position_id = Uuid::parse_str(&form.position).ok();

    if form.cv.as_ref().map_or(true, |cv| cv.size() == 0) {
        errors.add("cv", "CV file is empty");
    }

    finish(form, errors, age, position_id)
}

pub async fn validate_update(
    id: Uuid,
    form: EmployeeForm,
    records: &dyn RecordStore,
) -> Result<ValidEmployee, AppError> {
    let mut errors = ValidationErrors::default();

    check_names(&form, &mut errors);
    let age = check_age(&form, &mut errors);
    check_email(&form, Some(id), records, &mut errors).await?;

    let mut position_id = None;
    if form.position.is_empty() {
        errors.add("position", "Position is required");
    } else {
        let existing = match Uuid::parse_str(&form.position) {
            Ok(pid) => records.position_exists(pid).await?.then_some(pid),
            Err(_) => None,
        };
        if existing.is_none() {
            errors.add("position", "The selected position is invalid");
        }
        position_id = existing;
    }

    if let Some(cv) = &form.cv {
        check_cv_file(cv, &mut errors);
    }

    finish(form, errors, age, position_id)
}

fn check_names(form: &EmployeeForm, errors: &mut ValidationErrors) {
    if form.first_name.is_empty() {
        errors.add("firstName", "First name is required");
    }
    if form.last_name.is_empty() {
        errors.add("lastName", "Last name is required");
    }
}

fn check_age(form: &EmployeeForm, errors: &mut ValidationErrors) -> Option<i32> {
    if form.age.is_empty() {
        errors.add("age", "Age is required");
        return None;
    }
    match form.age.parse::<i32>() {
        Ok(age) => Some(age),
        Err(_) => {
            errors.add("age", "Fill age with a number");
            None
        }
    }
}

async fn check_email(
    form: &EmployeeForm,
    except: Option<Uuid>,
    records: &dyn RecordStore,
    errors: &mut ValidationErrors,
) -> Result<(), AppError> {
    if form.email.is_empty() {
        errors.add("email", "Email is required");
    } else if !form.email.validate_email() {
        errors.add("email", "Fill email with a valid email address");
    } else if records.email_taken(&form.email, except).await? {
        errors.add(
            "email",
            "This email is already in use. Please use another email.",
        );
    }
    Ok(())
}

fn check_cv_file(cv: &CvUpload, errors: &mut ValidationErrors) {
    let allowed = extension_of(&cv.file_name)
        .is_some_and(|ext| CV_EXTENSIONS.contains(&ext.as_str()));
    if !allowed {
        errors.add("cv", "File must be one of: pdf, doc, docx.");
    }
    if cv.size() > CV_MAX_BYTES {
        errors.add("cv", "File size may not exceed 2MB.");
    }
}

fn finish(
    form: EmployeeForm,
    mut errors: ValidationErrors,
    age: Option<i32>,
    position_id: Option<Uuid>,
) -> Result<ValidEmployee, AppError> {
    match age {
        Some(age) if errors.is_empty() => Ok(ValidEmployee {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            age,
            position_id,
            cv: form.cv,
        }),
        _ => {
            errors.input = form.echo();
            Err(AppError::Validation(errors))
        }
    }
}

use crate::config::Config;
use crate::employees::manager::EmployeeManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the record store and blob store handles.
    pub employees: EmployeeManager,
    pub config: Config,
}

// Employee records with an attached résumé file.
// Handlers parse the form; the manager validates, then writes blob and row.

pub mod form;
pub mod handlers;
pub mod manager;
pub mod repository;
pub mod validation;

pub mod employee;
pub mod position;

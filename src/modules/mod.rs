pub mod admins;
pub mod approvals;
pub mod auth;
pub mod classes;
pub mod problems;
pub mod students;
pub mod subjects;
pub mod teachers;

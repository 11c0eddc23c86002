//! PostgreSQL-backed stores.

use sqlx::PgPool;

use super::StoreError;

mod admins;
mod approvals;
mod classes;
mod problems;
mod students;
mod subjects;
mod teachers;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Client-facing message for a violated unique constraint.
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint.unwrap_or_default() {
        c if c.ends_with("phone_number_key") => "phone number already registered",
        "students_student_number_key" => "student number already registered",
        "teachers_employee_number_key" => "employee number already registered",
        "teachers_school_email_key" => "school email already registered",
        "admin_users_username_key" => "username already exists",
        "admin_users_email_key" => "email already exists",
        "teacher_approvals_teacher_id_key" => "approval record already exists",
        "classes_class_code_key" => "class code already exists",
        "subjects_subject_code_key" => "subject code already exists",
        "problems_title_slug_key" => "title slug already exists",
        _ => "record already exists",
    }
}

/// Converts unique violations into [`StoreError::Conflict`].
pub(super) fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(conflict_message(db_err.constraint()).to_string());
        }
    }
    StoreError::Database(err)
}

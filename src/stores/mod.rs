//! Persistence traits used by the services.
//!
//! [`postgres::PgStore`] is the production implementation. With the
//! `test-utils` feature, [`memory::MemoryStore`] provides an in-process one
//! with the same semantics for the test suite.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use elysia_core::{AppError, PaginationParams};
use elysia_models::admins::{AdminQueryParams, AdminStatus, AdminUser};
use elysia_models::approvals::{ApprovalDecision, ApprovalQueryParams, TeacherApproval};
use elysia_models::classes::{Class, ClassMember, ClassMemberDetail};
use elysia_models::problems::{Problem, ProblemQueryParams};
use elysia_models::students::{Student, StudentQueryParams};
use elysia_models::subjects::{Subject, SubjectQueryParams};
use elysia_models::teachers::{Teacher, TeacherQueryParams};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("{0}")]
    Conflict(String),
    /// A precondition checked inside a transaction no longer holds.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Maps a store failure onto the client-facing error taxonomy.
pub fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::Conflict(msg) | StoreError::Rejected(msg) => AppError::bad_request(anyhow!(msg)),
        StoreError::Database(e) => AppError::database(e),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>>;
    async fn find_student_by_phone(&self, phone: &str) -> StoreResult<Option<Student>>;
    async fn find_student_by_number(&self, student_number: &str) -> StoreResult<Option<Student>>;
    async fn create_student(&self, student: &Student) -> StoreResult<()>;
    async fn update_student(&self, student: &Student) -> StoreResult<()>;
    async fn list_students(&self, params: &StudentQueryParams) -> StoreResult<(Vec<Student>, i64)>;
}

#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>>;
    async fn find_teacher_by_phone(&self, phone: &str) -> StoreResult<Option<Teacher>>;
    async fn find_teacher_by_employee_number(&self, number: &str)
    -> StoreResult<Option<Teacher>>;
    async fn find_teacher_by_email(&self, email: &str) -> StoreResult<Option<Teacher>>;
    /// Inserts the teacher and its approval record together.
    async fn create_teacher(&self, teacher: &Teacher, approval: &TeacherApproval)
    -> StoreResult<()>;
    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()>;
    async fn list_teachers(&self, params: &TeacherQueryParams) -> StoreResult<(Vec<Teacher>, i64)>;
}

#[async_trait]
pub trait ApprovalStore: Send + Sync {
    async fn find_approval(&self, approval_id: &str) -> StoreResult<Option<TeacherApproval>>;
    async fn find_approval_by_teacher(&self, teacher_id: &str)
    -> StoreResult<Option<TeacherApproval>>;
    async fn list_approvals(
        &self,
        params: &ApprovalQueryParams,
    ) -> StoreResult<(Vec<TeacherApproval>, i64)>;
    /// Applies a decision to a pending approval and its teacher atomically.
    /// Fails with [`StoreError::Rejected`] if the approval is no longer pending.
    async fn decide_approval(&self, decision: &ApprovalDecision) -> StoreResult<TeacherApproval>;
    /// Deletes a pending approval. Returns `false` if none matched.
    async fn delete_pending_approval(&self, approval_id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin(&self, admin_id: &str) -> StoreResult<Option<AdminUser>>;
    async fn find_admin_by_phone(&self, phone: &str) -> StoreResult<Option<AdminUser>>;
    async fn find_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>>;
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>>;
    async fn create_admin(&self, admin: &AdminUser) -> StoreResult<()>;
    async fn update_admin_password(
        &self,
        admin_id: &str,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;
    async fn update_admin_status(&self, admin_id: &str, status: AdminStatus) -> StoreResult<()>;
    async fn record_admin_login(&self, admin_id: &str, at: DateTime<Utc>) -> StoreResult<()>;
    async fn record_admin_login_failure(&self, admin_id: &str) -> StoreResult<()>;
    async fn list_admins(&self, params: &AdminQueryParams) -> StoreResult<(Vec<AdminUser>, i64)>;
}

#[async_trait]
pub trait ClassStore: Send + Sync {
    async fn create_class(&self, class: &Class) -> StoreResult<()>;
    async fn find_class(&self, class_id: &str) -> StoreResult<Option<Class>>;
    async fn find_class_by_code(&self, class_code: &str) -> StoreResult<Option<Class>>;
    async fn update_class(&self, class: &Class) -> StoreResult<()>;
    async fn list_teacher_classes(
        &self,
        teacher_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)>;
    async fn list_student_classes(
        &self,
        student_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)>;
    async fn find_member(&self, class_id: &str, student_id: &str)
    -> StoreResult<Option<ClassMember>>;
    /// Adds an active member and increments the head count atomically,
    /// re-checking class status, capacity and existing membership.
    async fn join_class(&self, class_id: &str, student_id: &str, at: DateTime<Utc>)
    -> StoreResult<()>;
    /// Marks an active member as left and decrements the head count.
    async fn leave_class(&self, class_id: &str, student_id: &str) -> StoreResult<()>;
    async fn list_members(
        &self,
        class_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<ClassMemberDetail>, i64)>;
}

#[async_trait]
pub trait SubjectStore: Send + Sync {
    async fn create_subject(&self, subject: &Subject) -> StoreResult<()>;
    async fn find_subject(&self, subject_id: &str) -> StoreResult<Option<Subject>>;
    async fn find_subject_by_code(&self, code: &str) -> StoreResult<Option<Subject>>;
    async fn update_subject(&self, subject: &Subject) -> StoreResult<()>;
    async fn delete_subject(&self, subject_id: &str) -> StoreResult<bool>;
    async fn list_subjects(&self, params: &SubjectQueryParams) -> StoreResult<(Vec<Subject>, i64)>;
}

#[async_trait]
pub trait ProblemStore: Send + Sync {
    /// Inserts the problem, ignoring `problem.id`, and returns the stored row.
    async fn create_problem(&self, problem: &Problem) -> StoreResult<Problem>;
    async fn find_problem(&self, id: i64) -> StoreResult<Option<Problem>>;
    async fn find_problem_by_slug(&self, slug: &str) -> StoreResult<Option<Problem>>;
    async fn update_problem(&self, problem: &Problem) -> StoreResult<()>;
    async fn delete_problem(&self, id: i64) -> StoreResult<bool>;
    async fn list_problems(&self, params: &ProblemQueryParams) -> StoreResult<(Vec<Problem>, i64)>;
}

/// Every store trait, implemented by one backend.
pub trait Store:
    StudentStore
    + TeacherStore
    + ApprovalStore
    + AdminStore
    + ClassStore
    + SubjectStore
    + ProblemStore
    + 'static
{
}

impl<T> Store for T where
    T: StudentStore
        + TeacherStore
        + ApprovalStore
        + AdminStore
        + ClassStore
        + SubjectStore
        + ProblemStore
        + 'static
{
}

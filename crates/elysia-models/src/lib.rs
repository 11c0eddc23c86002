//! # Elysia Models
//!
//! Database entities, request/response DTOs and validation rules.
//!
//! - [`auth`]: SMS codes, login/registration payloads and token responses
//! - [`students`], [`teachers`], [`admins`]: account profiles
//! - [`approvals`]: teacher approval records
//! - [`classes`]: classes and membership
//! - [`subjects`], [`problems`]: teaching content
//! - [`ids`]: identifier and join-code generation
//! - [`validators`]: field validators shared by DTOs

pub mod admins;
pub mod approvals;
pub mod auth;
pub mod classes;
pub mod ids;
pub mod problems;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod validators;

pub use admins::{AdminStatus, AdminUser};
pub use approvals::TeacherApproval;
pub use auth::{CodeType, MessageResponse, RoleProfile};
pub use classes::{Class, ClassMember, ClassStatus, MemberStatus};
pub use problems::{Difficulty, Problem};
pub use students::{Student, StudentStatus};
pub use subjects::{Subject, SubjectStatus};
pub use teachers::{Teacher, TeacherStatus, VerificationStatus};

//! Subject identifiers and the roles they encode.
//!
//! The role of an account is carried by the prefix of its identifier, so a
//! token's subject is enough to know which profile table to consult.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const STUDENT_PREFIX: &str = "stu_";
pub const TEACHER_PREFIX: &str = "tea_";
/// Admins created by another admin.
pub const ADMIN_PREFIX: &str = "admin_";
/// Admins registered over SMS.
pub const SMS_ADMIN_PREFIX: &str = "adm_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("unrecognized subject identifier")]
    UnrecognizedIdentifier,
    #[error("unknown user type: {0}")]
    UnknownRole(String),
}

/// Maps a subject identifier to its role by prefix.
///
/// A bare prefix with nothing after it is rejected.
pub fn resolve_role(subject_id: &str) -> Result<Role, RoleError> {
    let candidates = [
        (STUDENT_PREFIX, Role::Student),
        (TEACHER_PREFIX, Role::Teacher),
        (ADMIN_PREFIX, Role::Admin),
        (SMS_ADMIN_PREFIX, Role::Admin),
    ];

    candidates
        .iter()
        .find_map(|(prefix, role)| {
            subject_id
                .strip_prefix(prefix)
                .filter(|rest| !rest.is_empty())
                .map(|_| *role)
        })
        .ok_or(RoleError::UnrecognizedIdentifier)
}

fn unix_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000))
}

pub fn new_student_id() -> String {
    format!("{STUDENT_PREFIX}{}", unix_nanos())
}

pub fn new_teacher_id() -> String {
    format!("{TEACHER_PREFIX}{}", unix_nanos())
}

pub fn new_sms_admin_id() -> String {
    format!("{SMS_ADMIN_PREFIX}{}", unix_nanos())
}

/// `admin_{unix_millis}_{8 hex chars}`
pub fn new_admin_id() -> String {
    let suffix: u32 = rand::thread_rng().r#gen();
    format!(
        "{ADMIN_PREFIX}{}_{:08x}",
        Utc::now().timestamp_millis(),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_prefixes() {
        assert_eq!(resolve_role("stu_1700000000"), Ok(Role::Student));
        assert_eq!(resolve_role("tea_1700000000"), Ok(Role::Teacher));
        assert_eq!(resolve_role("admin_1700_deadbeef"), Ok(Role::Admin));
        assert_eq!(resolve_role("adm_1700000000"), Ok(Role::Admin));
    }

    #[test]
    fn test_resolve_rejects_unknown_prefixes() {
        for id in ["", "stu", "stu_", "usr_123", "STU_123", "teacher_1", "123"] {
            assert_eq!(
                resolve_role(id),
                Err(RoleError::UnrecognizedIdentifier),
                "{id:?} should not resolve"
            );
        }
    }

    #[test]
    fn test_generated_ids_resolve_to_their_role() {
        assert_eq!(resolve_role(&new_student_id()), Ok(Role::Student));
        assert_eq!(resolve_role(&new_teacher_id()), Ok(Role::Teacher));
        assert_eq!(resolve_role(&new_sms_admin_id()), Ok(Role::Admin));
        assert_eq!(resolve_role(&new_admin_id()), Ok(Role::Admin));
    }

    #[test]
    fn test_admin_id_shape() {
        let id = new_admin_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "admin");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("teacher".parse::<Role>(), Ok(Role::Teacher));
        assert!("parent".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}

//! Seed configuration and generated rows.

/// How many rows of each kind to generate.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub students: usize,
    pub teachers: usize,
    pub subjects: usize,
    /// Plain-text password given to every seeded account.
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 200,
            teachers: 20,
            subjects: 12,
            password: "Password@123".into(),
        }
    }
}

pub struct StudentSeed {
    pub student_id: String,
    pub phone_number: String,
    pub student_name: String,
    pub student_number: String,
    pub email: String,
    pub major: String,
    pub grade: String,
}

pub struct TeacherSeed {
    pub teacher_id: String,
    pub phone_number: String,
    pub teacher_name: String,
    pub employee_number: String,
    pub school_email: String,
    pub department: String,
    pub teaching_years: i32,
}

pub struct SubjectSeed {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub category: String,
    pub credits: i32,
}

//! Student and teacher seeding.

use std::time::Instant;

use chrono::Utc;
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};

use elysia_auth::role::{STUDENT_PREFIX, TEACHER_PREFIX};
use elysia_models::{StudentStatus, TeacherStatus, VerificationStatus};

use super::models::{StudentSeed, TeacherSeed};

const MAJORS: &[&str] = &[
    "Computer Science",
    "Software Engineering",
    "Data Science",
    "Mathematics",
    "Electronic Engineering",
];
const GRADES: &[&str] = &["2021", "2022", "2023", "2024"];
const DEPARTMENTS: &[&str] = &[
    "School of Computing",
    "School of Mathematics",
    "School of Engineering",
];

// Postgres caps a statement at 65535 bind parameters.
const BATCH_SIZE: usize = 1000;

pub fn generate_students(count: usize) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| StudentSeed {
            student_id: format!("{STUDENT_PREFIX}seed{idx:08}"),
            phone_number: format!("139{idx:08}"),
            student_name: Name().fake(),
            student_number: format!("SEED{idx:06}"),
            email: FreeEmail().fake(),
            major: MAJORS[idx % MAJORS.len()].to_string(),
            grade: GRADES[idx % GRADES.len()].to_string(),
        })
        .collect()
}

/// Seeded teachers are approved and active so they can sign in immediately.
pub fn generate_teachers(count: usize) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| TeacherSeed {
            teacher_id: format!("{TEACHER_PREFIX}seed{idx:08}"),
            phone_number: format!("137{idx:08}"),
            teacher_name: Name().fake(),
            employee_number: format!("SEEDT{idx:05}"),
            school_email: format!("teacher{idx}@seed.example.edu"),
            department: DEPARTMENTS[idx % DEPARTMENTS.len()].to_string(),
            teaching_years: (1..30).fake(),
        })
        .collect()
}

pub async fn seed_students(db: &PgPool, count: usize, password_hash: &str) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🎓 Seeding {count} students...");

    let students = generate_students(count);
    let now = Utc::now();
    let mut inserted = 0;
    for chunk in students.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO students (student_id, phone_number, password_hash, student_name,
                 student_number, email, major, grade, status, created_at, updated_at) ",
        );
        query.push_values(chunk, |mut row, s| {
            row.push_bind(&s.student_id)
                .push_bind(&s.phone_number)
                .push_bind(password_hash)
                .push_bind(&s.student_name)
                .push_bind(&s.student_number)
                .push_bind(&s.email)
                .push_bind(&s.major)
                .push_bind(&s.grade)
                .push_bind(StudentStatus::Active)
                .push_bind(now)
                .push_bind(now);
        });
        query.push(" ON CONFLICT DO NOTHING");
        inserted += query.build().execute(db).await?.rows_affected();
    }

    println!("   ✓ Inserted {inserted} students in {:?}", start_time.elapsed());
    Ok(inserted)
}

pub async fn seed_teachers(db: &PgPool, count: usize, password_hash: &str) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {count} teachers...");

    let teachers = generate_teachers(count);
    let now = Utc::now();
    let mut inserted = 0;
    for chunk in teachers.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO teachers (teacher_id, phone_number, password_hash, teacher_name,
                 employee_number, school_email, department, teaching_years,
                 verification_status, verification_time, verification_remark, status,
                 created_at, updated_at) ",
        );
        query.push_values(chunk, |mut row, t| {
            row.push_bind(&t.teacher_id)
                .push_bind(&t.phone_number)
                .push_bind(password_hash)
                .push_bind(&t.teacher_name)
                .push_bind(&t.employee_number)
                .push_bind(&t.school_email)
                .push_bind(&t.department)
                .push_bind(t.teaching_years)
                .push_bind(VerificationStatus::Approved)
                .push_bind(now)
                .push_bind("seeded")
                .push_bind(TeacherStatus::Active)
                .push_bind(now)
                .push_bind(now);
        });
        query.push(" ON CONFLICT DO NOTHING");
        inserted += query.build().execute(db).await?.rows_affected();
    }

    println!("   ✓ Inserted {inserted} teachers in {:?}", start_time.elapsed());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elysia_auth::{Role, resolve_role};

    #[test]
    fn test_generated_students_are_unique_and_resolvable() {
        let students = generate_students(50);
        assert_eq!(students.len(), 50);
        for s in &students {
            assert_eq!(resolve_role(&s.student_id), Ok(Role::Student));
            assert_eq!(s.phone_number.len(), 11);
        }
        let mut phones: Vec<_> = students.iter().map(|s| &s.phone_number).collect();
        phones.sort();
        phones.dedup();
        assert_eq!(phones.len(), 50);
    }

    #[test]
    fn test_generated_teachers_resolve_to_teacher() {
        for t in generate_teachers(10) {
            assert_eq!(resolve_role(&t.teacher_id), Ok(Role::Teacher));
            assert!(t.school_email.ends_with("@seed.example.edu"));
        }
    }
}

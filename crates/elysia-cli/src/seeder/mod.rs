//! Development data seeding.
//!
//! Seeded rows use recognizable identifiers (`stu_seed…`, `tea_seed…`,
//! `subj_seed…`) so [`clear_all`] can remove them without touching real data.

mod models;
mod people;
mod subjects;

use std::time::Instant;

use sqlx::PgPool;

use elysia_core::hash_password;

pub use models::{SeedConfig, StudentSeed, SubjectSeed, TeacherSeed};
pub use people::{generate_students, generate_teachers, seed_students, seed_teachers};
pub use subjects::{generate_subjects, seed_subjects};

/// Seeds students, approved teachers and subjects.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password(&config.password).map_err(|e| e.error)?;

    seed_students(db, config.students, &password_hash).await?;
    seed_teachers(db, config.teachers, &password_hash).await?;
    seed_subjects(db, config.subjects).await?;

    println!("✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Deletes every seeded row, including memberships and classes that point at
/// seeded accounts.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;
    let mut removed = 0;
    for statement in [
        "DELETE FROM class_members WHERE student_id LIKE 'stu_seed%'
             OR class_id IN (SELECT class_id FROM classes WHERE teacher_id LIKE 'tea_seed%')",
        "DELETE FROM classes WHERE teacher_id LIKE 'tea_seed%'",
        "DELETE FROM teacher_approvals WHERE teacher_id LIKE 'tea_seed%'",
        "DELETE FROM teachers WHERE teacher_id LIKE 'tea_seed%'",
        "DELETE FROM students WHERE student_id LIKE 'stu_seed%'",
        "DELETE FROM subjects WHERE subject_id LIKE 'subj_seed%'",
    ] {
        removed += sqlx::query(statement).execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;

    println!("   ✓ Deleted {removed} rows in {:?}", start_time.elapsed());
    Ok(removed)
}

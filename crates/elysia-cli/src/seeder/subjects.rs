//! Subject catalogue seeding.

use std::time::Instant;

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use elysia_models::SubjectStatus;

use super::models::SubjectSeed;

const CATALOGUE: &[(&str, &str)] = &[
    ("Programming Fundamentals", "core"),
    ("Data Structures", "core"),
    ("Algorithms", "core"),
    ("Operating Systems", "core"),
    ("Computer Networks", "core"),
    ("Databases", "core"),
    ("Compilers", "elective"),
    ("Machine Learning", "elective"),
    ("Computer Graphics", "elective"),
    ("Distributed Systems", "elective"),
    ("Discrete Mathematics", "foundation"),
    ("Linear Algebra", "foundation"),
];

pub fn generate_subjects(count: usize) -> Vec<SubjectSeed> {
    (0..count)
        .map(|idx| {
            let (name, category) = CATALOGUE[idx % CATALOGUE.len()];
            let round = idx / CATALOGUE.len();
            SubjectSeed {
                subject_id: format!("subj_seed{idx:06}"),
                subject_name: if round == 0 {
                    name.to_string()
                } else {
                    format!("{name} {}", round + 1)
                },
                subject_code: format!("SEED{idx:04}"),
                category: category.to_string(),
                credits: if category == "core" { 4 } else { 3 },
            }
        })
        .collect()
}

pub async fn seed_subjects(db: &PgPool, count: usize) -> anyhow::Result<u64> {
    if count == 0 {
        return Ok(0);
    }
    let start_time = Instant::now();
    println!("📚 Seeding {count} subjects...");

    let subjects = generate_subjects(count);
    let now = Utc::now();
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO subjects (subject_id, subject_name, subject_code, category, credits,
             status, created_at, updated_at) ",
    );
    query.push_values(&subjects, |mut row, s| {
        row.push_bind(&s.subject_id)
            .push_bind(&s.subject_name)
            .push_bind(&s.subject_code)
            .push_bind(&s.category)
            .push_bind(s.credits)
            .push_bind(SubjectStatus::Enabled)
            .push_bind(now)
            .push_bind(now);
    });
    query.push(" ON CONFLICT DO NOTHING");
    let inserted = query.build().execute(db).await?.rows_affected();

    println!("   ✓ Inserted {inserted} subjects in {:?}", start_time.elapsed());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_codes_are_unique_past_the_catalogue() {
        let subjects = generate_subjects(CATALOGUE.len() * 2 + 1);
        let mut codes: Vec<_> = subjects.iter().map(|s| s.subject_code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), subjects.len());
        assert_eq!(subjects[CATALOGUE.len()].subject_name, "Programming Fundamentals 2");
    }
}

//! Identifiers for non-account entities and class join codes.
//!
//! Account identifiers live in `elysia_auth::role` because their prefixes
//! decide the role.

use chrono::Utc;
use rand::Rng;

const CLASS_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CLASS_CODE_LEN: usize = 6;

fn unix_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000))
}

pub fn new_class_id() -> String {
    format!("cls_{}", unix_nanos())
}

pub fn new_subject_id() -> String {
    format!("subj_{}", unix_nanos())
}

pub fn new_approval_id() -> String {
    format!("APV{}", unix_nanos())
}

/// Six characters from `A-Z0-9`.
pub fn new_class_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CLASS_CODE_LEN)
        .map(|_| CLASS_CODE_ALPHABET[rng.gen_range(0..CLASS_CODE_ALPHABET.len())] as char)
        .collect()
}

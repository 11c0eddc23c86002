//! Cache key layout.

fn build_key(prefix: &str, parts: &[&str]) -> String {
    format!("{}:{}", prefix, parts.join(":"))
}

pub mod verification {
    use super::build_key;

    /// Outstanding code for a phone and purpose (e.g. `student_register`).
    pub fn code(prefix: &str, purpose: &str, phone: &str) -> String {
        build_key(prefix, &["verify_code", purpose, phone])
    }

    /// Send cooldown slot for a scope.
    pub fn send_lock(prefix: &str, scope: &str) -> String {
        build_key(prefix, &["sms_send", scope])
    }
}

pub mod tokens {
    use super::build_key;

    pub fn revoked(prefix: &str, fingerprint: &str) -> String {
        build_key(prefix, &["revoked_token", fingerprint])
    }
}

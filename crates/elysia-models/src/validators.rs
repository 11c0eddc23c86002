//! Field validators used with `#[validate(custom(function = ...))]`.

use std::borrow::Cow;

use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Mainland mobile numbers: exactly 11 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 11 && phone.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(error("phone", "phone number must be 11 digits"))
    }
}

/// Six ASCII digits.
pub fn validate_sms_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(error("sms_code", "verification code must be 6 digits"))
    }
}

/// 3-128 characters from `[A-Za-z0-9_.-]`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len_ok = (3..=128).contains(&username.len());
    let chars_ok = username
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'));
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(error(
            "username",
            "username must be 3-128 characters of letters, digits, '_', '.' or '-'",
        ))
    }
}

/// At least 6 characters with an uppercase letter, a lowercase letter, a
/// digit and a special character.
pub fn validate_strong_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 6;
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace());

    if long_enough && upper && lower && digit && special {
        Ok(())
    } else {
        Err(error(
            "password_strength",
            "password must be at least 6 characters and include upper and lower case letters, a digit and a special character",
        ))
    }
}

/// Lowercase letters, digits and single hyphens, e.g. `two-sum`.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(error("slug", "slug must be lowercase letters, digits and hyphens"))
    }
}

/// Lowercase and trim an email address. All storage and lookups use this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Check a password against the account policy. Every failed rule is
/// reported so clients can show the full list at once.
pub fn validate_password(password: &str) -> Result<(), Vec<&'static str>> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("must contain a digit");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        errors.push("must contain a special character");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

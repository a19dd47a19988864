//! Credential form validation, applied before any provider call.

use crate::notify::{Notification, messages};
use crate::password;

/// Validated sign-in input. The email is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn required(email: &str, password: &str) -> Result<Credentials, Notification> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(Notification::warning(messages::FILL_ALL_FIELDS));
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Both fields are required.
pub fn validate_sign_in(email: &str, password: &str) -> Result<Credentials, Notification> {
    required(email, password)
}

/// Both fields are required and the password must be strong.
pub fn validate_registration(email: &str, password: &str) -> Result<Credentials, Notification> {
    let credentials = required(email, password)?;
    if !password::is_strong(&credentials.password) {
        return Err(Notification::warning(messages::WEAK_PASSWORD_RULE));
    }
    Ok(credentials)
}

/// Returns the trimmed email, which is required.
pub fn validate_reset(email: &str) -> Result<String, Notification> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Notification::warning(messages::RESET_NEEDS_EMAIL));
    }
    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;

    #[test]
    fn test_sign_in_requires_both_fields() {
        for (email, password) in [("", "x"), ("a@b.com", ""), ("   ", "x"), ("", "")] {
            let err = validate_sign_in(email, password).unwrap_err();
            assert_eq!(err.severity, Severity::Warning);
            assert_eq!(err.message, messages::FILL_ALL_FIELDS);
        }
        let ok = validate_sign_in(" a@b.com ", "x").unwrap();
        assert_eq!(ok.email, "a@b.com");
    }

    #[test]
    fn test_registration_checks_strength() {
        let err = validate_registration("a@b.com", "password").unwrap_err();
        assert_eq!(err.severity, Severity::Warning);
        assert_eq!(err.message, messages::WEAK_PASSWORD_RULE);
        assert!(validate_registration("a@b.com", "Passw0rd!").is_ok());
        assert_eq!(
            validate_registration("", "Passw0rd!").unwrap_err().message,
            messages::FILL_ALL_FIELDS
        );
    }

    #[test]
    fn test_reset_requires_email() {
        assert_eq!(
            validate_reset("  ").unwrap_err().message,
            messages::RESET_NEEDS_EMAIL
        );
        assert_eq!(validate_reset(" a@b.com").unwrap(), "a@b.com");
    }
}

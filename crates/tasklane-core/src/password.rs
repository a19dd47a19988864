//! Registration password strength predicate.
//!
//! A password is strong when it has at least 8 characters, all drawn from
//! letters, digits and `!@#$%^&*`, and contains at least one lowercase letter,
//! one uppercase letter, one digit and one of those symbols.

use std::sync::OnceLock;

use regex::RegexSet;

/// Symbols accepted (and one of which is required) in a password.
pub const SYMBOLS: &str = "!@#$%^&*";

/// Minimum password length accepted by registration.
pub const MIN_LENGTH: usize = 8;

/// Every pattern must match for the candidate to pass.
const PATTERNS: [&str; 5] = [
    r"^[A-Za-z0-9!@#$%^&*]{8,}$",
    r"[a-z]",
    r"[A-Z]",
    r"[0-9]",
    r"[!@#$%^&*]",
];

fn rules() -> &'static RegexSet {
    static RULES: OnceLock<RegexSet> = OnceLock::new();
    RULES.get_or_init(|| RegexSet::new(PATTERNS).expect("password patterns are valid"))
}

/// Returns true when `candidate` satisfies the strength predicate.
pub fn is_strong(candidate: &str) -> bool {
    rules().matches(candidate).matched_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_mixed_password() {
        assert!(is_strong("Passw0rd!"));
        assert!(is_strong("Abcdef1!"));
        assert!(is_strong("zZ9^zZ9^zZ9^"));
    }

    #[test]
    fn test_rejects_missing_classes() {
        assert!(!is_strong("password"));
        assert!(!is_strong("Password1"), "no symbol");
        assert!(!is_strong("password1!"), "no uppercase");
        assert!(!is_strong("PASSWORD1!"), "no lowercase");
        assert!(!is_strong("Password!!"), "no digit");
    }

    #[test]
    fn test_rejects_short_or_foreign_characters() {
        assert!(!is_strong("Ab1!xyz"), "seven characters");
        assert!(!is_strong(""));
        assert!(!is_strong("Abcdef1! "), "space is not allowed");
        assert!(!is_strong("Abcdef1!_"), "underscore is not in the symbol set");
        assert!(!is_strong("Ábcdef1!"), "non-ASCII letter");
    }

    #[test]
    fn test_unicode_digits_do_not_count() {
        assert!(!is_strong("Abcdefg!٣"));
    }
}

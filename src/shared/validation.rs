use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Structural email check: local-part@domain
    /// - Valid: "user@example.com", "first.last+tag@sub.domain"
    /// - Invalid: "no-at-sign", "@domain", "user@"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").unwrap();
}

/// Password strength policy: at least 8 characters with an uppercase letter,
/// a lowercase letter, and a digit.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex_valid() {
        assert!(EMAIL_REGEX.is_match("user@example.com"));
        assert!(EMAIL_REGEX.is_match("first.last+tag@sub.domain.org"));
        assert!(EMAIL_REGEX.is_match("a@b"));
        assert!(EMAIL_REGEX.is_match("user_name-1@example.co"));
    }

    #[test]
    fn test_email_regex_invalid() {
        assert!(!EMAIL_REGEX.is_match("no-at-sign")); // missing @
        assert!(!EMAIL_REGEX.is_match("@domain.com")); // empty local part
        assert!(!EMAIL_REGEX.is_match("user@")); // empty domain
        assert!(!EMAIL_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abc12345"));
        assert!(is_strong_password("Str0ngPassword"));

        assert!(!is_strong_password("abc12345")); // no uppercase
        assert!(!is_strong_password("ABCDEFGH")); // no digit, no lowercase
        assert!(!is_strong_password("ABC12345")); // no lowercase
        assert!(!is_strong_password("Abc1234")); // too short
        assert!(!is_strong_password("")); // empty
    }
}

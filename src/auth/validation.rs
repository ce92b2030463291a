use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_NAME_LEN: usize = 50;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref RESET_CODE_RE: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// First and last names are checked independently. A name made only of
/// whitespace counts as empty.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_NAME_LEN
}

pub fn is_valid_reset_code(code: &str) -> bool {
    RESET_CODE_RE.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_emails() {
        assert!(is_valid_email("leonwu@gmail.com"));
        assert!(is_valid_email("first.last@mail.unsw.edu.au"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("ufhsdfkshfdhfsfhiw"));
        assert!(!is_valid_email("iloveyou.gmail.com"));
        assert!(!is_valid_email("no-dot@domain"));
        assert!(!is_valid_email("two@@at.com"));
        assert!(!is_valid_email("space in@mail.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_boundary_is_six() {
        assert!(is_valid_password("abcdef"));
        assert!(!is_valid_password("abcde"));
        assert!(!is_valid_password(""));
    }

    #[test]
    fn name_bounds_are_inclusive() {
        assert!(is_valid_name("A"));
        assert!(is_valid_name(&"K".repeat(50)));
        assert!(!is_valid_name(&"K".repeat(51)));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name("\t"));
        assert!(is_valid_name(" Ann "));
    }

    #[test]
    fn name_length_counts_chars_not_bytes() {
        assert!(is_valid_name(&"é".repeat(50)));
    }

    #[test]
    fn reset_code_must_be_six_digits() {
        assert!(is_valid_reset_code("012345"));
        assert!(!is_valid_reset_code("1234"));
        assert!(!is_valid_reset_code("1234567"));
        assert!(!is_valid_reset_code("12a456"));
    }
}

//! Syntactic patterns used by field validation.

use std::sync::OnceLock;

use regex::Regex;

/// Local part, `@`, dotted domain labels, alphabetic top-level domain.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";

/// The compiled email pattern.
///
/// # Panics
///
/// Panics if the built-in pattern is invalid, which the tests rule out.
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"))
}

/// Check whether `value` is a syntactically valid email address.
///
/// The regex does the shape check; leading dots and `..` runs in the local
/// part are rejected separately since the regex engine has no lookaround.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.contains("..") {
        return false;
    }
    email_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
    }

    #[test]
    fn test_valid_emails() {
        for email in [
            "ana@example.com",
            "ana.souza@empresa.com.br",
            "first+tag@sub.domain.org",
            "o'neil@example.ie",
            "  padded@example.com  ",
        ] {
            assert!(is_valid_email(email), "expected valid: {email}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "ana",
            "ana@",
            "@example.com",
            "ana@example",
            "ana@example.c",
            ".ana@example.com",
            "ana..souza@example.com",
            "ana.@example.com",
            "ana souza@example.com",
            "ana@-example.com",
        ] {
            assert!(!is_valid_email(email), "expected invalid: {email}");
        }
    }
}

//! String formats attached with a `.suffix` (`string.email`, `string.uuid`, ...).

use std::fmt::{self, Display};

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("url pattern compiles")
});

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

static ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]*$").expect("alpha pattern compiles"));

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]*$").expect("alphanumeric pattern compiles"));

static DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*$").expect("digits pattern compiles"));

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

/// A named string format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    /// One `@`, a non-empty local part and a dotted, non-empty domain.
    Email,
    /// `scheme://host...`
    Url,
    /// Canonical hyphenated UUID, any version.
    Uuid,
    /// ASCII letters only.
    Alpha,
    /// ASCII letters and digits only.
    Alphanumeric,
    /// ASCII digits only.
    Digits,
    /// No uppercase characters.
    Lowercase,
    /// No lowercase characters.
    Uppercase,
    /// `YYYY-MM-DD` calendar date.
    Date,
    /// RFC 3339 timestamp.
    DateTime,
}

impl StringFormat {
    /// Every supported format, in suffix order.
    pub const ALL: [StringFormat; 10] = [
        StringFormat::Email,
        StringFormat::Url,
        StringFormat::Uuid,
        StringFormat::Alpha,
        StringFormat::Alphanumeric,
        StringFormat::Digits,
        StringFormat::Lowercase,
        StringFormat::Uppercase,
        StringFormat::Date,
        StringFormat::DateTime,
    ];

    /// Looks a format up by its grammar suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.suffix() == suffix)
    }

    /// The grammar suffix, e.g. `email` in `string.email`.
    pub fn suffix(&self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Url => "url",
            StringFormat::Uuid => "uuid",
            StringFormat::Alpha => "alpha",
            StringFormat::Alphanumeric => "alphanumeric",
            StringFormat::Digits => "digits",
            StringFormat::Lowercase => "lowercase",
            StringFormat::Uppercase => "uppercase",
            StringFormat::Date => "date",
            StringFormat::DateTime => "datetime",
        }
    }

    /// Returns true if `s` is in this format.
    pub fn matches(&self, s: &str) -> bool {
        match self {
            StringFormat::Email => is_email(s),
            StringFormat::Url => URL.is_match(s),
            StringFormat::Uuid => UUID.is_match(s),
            StringFormat::Alpha => ALPHA.is_match(s),
            StringFormat::Alphanumeric => ALPHANUMERIC.is_match(s),
            StringFormat::Digits => DIGITS.is_match(s),
            StringFormat::Lowercase => !s.chars().any(char::is_uppercase),
            StringFormat::Uppercase => !s.chars().any(char::is_lowercase),
            StringFormat::Date => {
                DATE.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
            }
            StringFormat::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
        }
    }
}

impl Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

fn is_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && domain.contains('.'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(StringFormat::Email.matches("a@b.com"));
        assert!(StringFormat::Email.matches("first.last@mail.example.org"));
        assert!(!StringFormat::Email.matches("not-an-email"));
        assert!(!StringFormat::Email.matches("@b.com"));
        assert!(!StringFormat::Email.matches("a@b"));
        assert!(!StringFormat::Email.matches("a@@b.com"));
        assert!(!StringFormat::Email.matches("a@b@c.com"));
    }

    #[test]
    fn test_suffix_round_trip() {
        for format in StringFormat::ALL {
            assert_eq!(StringFormat::from_suffix(format.suffix()), Some(format));
        }
        assert_eq!(StringFormat::from_suffix("phone"), None);
    }

    #[test]
    fn test_uuid() {
        assert!(StringFormat::Uuid.matches("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!StringFormat::Uuid.matches("123e4567e89b12d3a456426614174000"));
    }

    #[test]
    fn test_url() {
        assert!(StringFormat::Url.matches("https://example.com/path?q=1"));
        assert!(!StringFormat::Url.matches("example.com"));
        assert!(!StringFormat::Url.matches("https://"));
    }

    #[test]
    fn test_character_classes() {
        assert!(StringFormat::Alpha.matches("abcXYZ"));
        assert!(!StringFormat::Alpha.matches("abc1"));
        assert!(StringFormat::Alphanumeric.matches("abc123"));
        assert!(StringFormat::Digits.matches("0042"));
        assert!(!StringFormat::Digits.matches("4.2"));
        assert!(StringFormat::Lowercase.matches("hello world"));
        assert!(!StringFormat::Lowercase.matches("Hello"));
        assert!(StringFormat::Uppercase.matches("HELLO 1"));
    }

    #[test]
    fn test_dates() {
        assert!(StringFormat::Date.matches("2024-02-29"));
        assert!(!StringFormat::Date.matches("2023-02-29"));
        assert!(!StringFormat::Date.matches("2024-2-9"));
        assert!(!StringFormat::Date.matches("24-02-09"));
        assert!(!StringFormat::Date.matches(" 2024-02-09"));
        assert!(!StringFormat::Date.matches("+12024-02-09"));
        assert!(StringFormat::DateTime.matches("2024-01-15T10:30:00Z"));
        assert!(!StringFormat::DateTime.matches("2024-01-15"));
    }
}

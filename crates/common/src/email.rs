//! Email address classification
//!
//! Mirrors the structural checks the application form performs: a local
//! part, one `@`, and a domain of at least two dot-separated labels ending
//! in an alphabetic top-level label.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$")
        .expect("domain pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailRejection {
    MissingAt,
    MultipleAt,
    MissingLocalPart,
    InvalidLocalPart,
    MissingDomain,
    MalformedDomain,
}

impl fmt::Display for EmailRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingAt => "missing @",
            Self::MultipleAt => "more than one @",
            Self::MissingLocalPart => "nothing before @",
            Self::InvalidLocalPart => "whitespace before @",
            Self::MissingDomain => "nothing after @",
            Self::MalformedDomain => "domain needs a name and a top-level part",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for EmailRejection {}

pub fn classify_email(raw: &str) -> Result<(), EmailRejection> {
    let Some((local, domain)) = raw.split_once('@') else {
        return Err(EmailRejection::MissingAt);
    };

    if domain.contains('@') {
        return Err(EmailRejection::MultipleAt);
    }
    if local.is_empty() {
        return Err(EmailRejection::MissingLocalPart);
    }
    if local.chars().any(char::is_whitespace) {
        return Err(EmailRejection::InvalidLocalPart);
    }
    if domain.is_empty() {
        return Err(EmailRejection::MissingDomain);
    }
    if !DOMAIN_PATTERN.is_match(domain) {
        return Err(EmailRejection::MalformedDomain);
    }

    Ok(())
}

pub fn is_valid_email(raw: &str) -> bool {
    classify_email(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("test", false ; "no at sign")]
    #[test_case("test@", false ; "no domain")]
    #[test_case("test@tester", false ; "no top level domain")]
    #[test_case("test@tester.", false ; "trailing dot")]
    #[test_case("test@.com", false ; "empty domain label")]
    #[test_case("test@tester.com", true ; "valid")]
    fn test_form_boundary(raw: &str, expected: bool) {
        assert_eq!(is_valid_email(raw), expected);
    }

    #[test]
    fn test_reasons() {
        assert_eq!(classify_email("test"), Err(EmailRejection::MissingAt));
        assert_eq!(classify_email("test@"), Err(EmailRejection::MissingDomain));
        assert_eq!(classify_email("@tester.com"), Err(EmailRejection::MissingLocalPart));
        assert_eq!(classify_email("a@b@tester.com"), Err(EmailRejection::MultipleAt));
        assert_eq!(classify_email("te st@tester.com"), Err(EmailRejection::InvalidLocalPart));
        assert_eq!(classify_email("test@tester"), Err(EmailRejection::MalformedDomain));
        assert_eq!(classify_email("test@tester."), Err(EmailRejection::MalformedDomain));
        assert_eq!(classify_email("test@.com"), Err(EmailRejection::MalformedDomain));
    }

    #[test]
    fn test_accepts_common_shapes() {
        assert!(is_valid_email("first.last+tag@mail.tester.com"));
        assert!(is_valid_email("x7@my-host.se"));
        assert!(!is_valid_email("x7@-host.se"));
        assert!(!is_valid_email("x7@host.c"));
    }
}

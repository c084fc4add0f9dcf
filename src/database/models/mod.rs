pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap()
});

pub(crate) fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub(crate) fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub(crate) fn violation(errors: &mut HashMap<String, String>, field: &str, message: &str) {
    errors.insert(field.to_string(), message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("john@gmail.com"));
        assert!(is_valid_email("mary.smith@devworks.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn url_pattern() {
        assert!(is_valid_url("https://devworks.com"));
        assert!(is_valid_url("http://www.devworks.com/about"));
        assert!(!is_valid_url("ftp://devworks.com"));
        assert!(!is_valid_url("devworks.com"));
    }
}

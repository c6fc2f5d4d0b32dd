use std::sync::OnceLock;

use regex::Regex;
use url::Url;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .unwrap()
    })
}

/// A pragmatic address check: a local part, an `@`, and a domain with at least two labels.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_regex().is_match(email)
}

/// True for absolute URIs with a scheme, e.g. `https://school.example/paid`.
pub fn is_valid_uri(uri: &str) -> bool {
    match Url::parse(uri) {
        Ok(url) => !url.scheme().is_empty() && !uri.chars().any(char::is_whitespace),
        Err(_) => false,
    }
}

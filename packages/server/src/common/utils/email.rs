use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Email pattern - RFC 5322 simplified, whole string
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9-]+(?:\.[A-Z0-9-]+)*\.[A-Z]{2,}$").unwrap();
}

/// Syntactic plausibility only. Deliverability is the processor's concern.
pub fn is_plausible_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

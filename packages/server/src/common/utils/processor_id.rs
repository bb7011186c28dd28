use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Ids the processor issues: RE..., MD..., CU... Letters, digits, underscore.
    static ref PROCESSOR_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]{1,64}$").unwrap();
}

/// Whether `id` could have been issued by the payment processor.
///
/// Ids end up in request paths, so anything else is refused before a remote call.
pub fn is_processor_id(id: &str) -> bool {
    PROCESSOR_ID_REGEX.is_match(id)
}

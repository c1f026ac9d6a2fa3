// Compiled text patterns for contact details

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email matcher: local part, '@', dotted domain ending in a 2+ letter TLD.
pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w.-]+@[\w.-]+\.[a-zA-Z]{2,}").expect("email pattern is valid")
});

/// Phone matcher: optional +country code, optional (area) code, then at
/// least five digits followed by any run of digits, spaces and dashes.
pub static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s-]?)?(?:\(\d{1,4}\)[\s-]?)?\d{5,}[\d\s-]*")
        .expect("phone pattern is valid")
});

pub const MAILTO_PREFIX: &str = "mailto:";
pub const TEL_PREFIX: &str = "tel:";

/// Strip a URI scheme prefix, ignoring ASCII case.
pub fn strip_scheme<'a>(href: &'a str, scheme: &str) -> Option<&'a str> {
    let head = href.get(..scheme.len())?;
    if head.eq_ignore_ascii_case(scheme) {
        Some(&href[scheme.len()..])
    } else {
        None
    }
}

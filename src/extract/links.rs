// Contact page discovery

use reqwest::Url;
use scraper::Html;

use super::contacts::anchor_selector;

/// Keyword an href must contain (case-insensitive) to count as a contact link
const CONTACT_KEYWORD: &str = "contact";

/// First link whose href mentions "contact", resolved against `base`.
///
/// Hrefs that do not resolve to an http(s) URL (e.g. `mailto:contact@...`)
/// are skipped.
pub fn find_contact_link(document: &Html, base: &Url) -> Option<Url> {
    document
        .select(&anchor_selector())
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| href.to_lowercase().contains(CONTACT_KEYWORD))
        .filter_map(|href| base.join(href).ok())
        .find(|url| matches!(url.scheme(), "http" | "https"))
}

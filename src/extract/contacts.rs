// Email and phone extraction from HTML documents

use std::collections::{BTreeSet, HashSet};

use scraper::{Html, Selector};

use super::patterns::{strip_scheme, EMAIL, MAILTO_PREFIX, PHONE, TEL_PREFIX};

/// Contact details found on one or more pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }

    /// Union another page's findings into this one
    pub fn merge(&mut self, other: Contacts) {
        self.emails.extend(other.emails);
        self.phones.extend(other.phones);
    }
}

pub(crate) fn anchor_selector() -> Selector {
    Selector::parse("a[href]").expect("anchor selector is valid")
}

/// Pulls emails and phone numbers out of page text and links.
#[derive(Debug, Clone)]
pub struct ContactExtractor {
    junk_domains: HashSet<String>,
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new(
            crate::config::constants::DEFAULT_JUNK_EMAIL_DOMAINS
                .iter()
                .copied(),
        )
    }
}

impl ContactExtractor {
    pub fn new<I, S>(junk_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            junk_domains: junk_domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// True when the address belongs to a junk domain (the part after the last '@').
    pub fn is_junk(&self, email: &str) -> bool {
        let domain = email.rsplit('@').next().unwrap_or(email);
        self.junk_domains.contains(&domain.to_ascii_lowercase())
    }

    /// Parse `html` and extract its contacts.
    pub fn extract(&self, html: &str) -> Contacts {
        if html.trim().is_empty() {
            return Contacts::default();
        }
        self.extract_document(&Html::parse_document(html))
    }

    /// Extract contacts from an already parsed document.
    pub fn extract_document(&self, document: &Html) -> Contacts {
        let mut contacts = Contacts::default();

        // Text nodes are space-joined so adjacent elements don't fuse into one match.
        let text = document.root_element().text().collect::<Vec<_>>().join(" ");

        for m in EMAIL.find_iter(&text) {
            self.push_email(&mut contacts, m.as_str());
        }

        for anchor in document.select(&anchor_selector()) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if let Some(rest) = strip_scheme(href, MAILTO_PREFIX) {
                let address = rest.split('?').next().unwrap_or_default();
                self.push_email(&mut contacts, address);
            } else if let Some(rest) = strip_scheme(href, TEL_PREFIX) {
                push_nonempty(&mut contacts.phones, rest);
            }
        }

        for m in PHONE.find_iter(&text) {
            push_nonempty(&mut contacts.phones, m.as_str());
        }

        contacts
    }

    fn push_email(&self, contacts: &mut Contacts, raw: &str) {
        let email = raw.trim();
        if !email.is_empty() && !self.is_junk(email) {
            contacts.emails.insert(email.to_string());
        }
    }
}

fn push_nonempty(set: &mut BTreeSet<String>, raw: &str) {
    let value = raw.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

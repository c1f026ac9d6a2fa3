// Single-site scrape: landing page with scheme fallback, then contact page

use reqwest::Url;
use scraper::Html;
use serde::{Deserialize, Serialize};

use super::fetcher::{Page, PageFetcher};
use crate::extract::{find_contact_link, ContactExtractor, Contacts};

pub const UNREACHABLE: &str = "Site not reachable";

/// Outcome of scraping one input URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteReport {
    /// The URL as given by the caller
    pub url: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub error: Option<String>,
    pub contact_page: Option<String>,
}

impl SiteReport {
    pub fn unreachable(url: &str) -> Self {
        Self {
            url: url.to_string(),
            emails: Vec::new(),
            phones: Vec::new(),
            error: Some(UNREACHABLE.to_string()),
            contact_page: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.error.is_none()
    }
}

/// URLs to try, in order, for a user-supplied address.
///
/// Explicit `http://` is tried as-is only. `https://` falls back to plain
/// http. A bare host is tried over https first, then http.
pub fn candidate_urls(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    if let Some(rest) = strip_prefix_ci(input, "http://") {
        vec![format!("http://{rest}")]
    } else if let Some(rest) = strip_prefix_ci(input, "https://") {
        vec![format!("https://{rest}"), format!("http://{rest}")]
    } else {
        vec![format!("https://{input}"), format!("http://{input}")]
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Contacts on the landing page plus where its contact page lives.
/// Parsing stays synchronous: `Html` must not be held across an await.
fn analyze_landing(extractor: &ContactExtractor, page: &Page) -> (Contacts, Url) {
    let document = Html::parse_document(&page.html);
    let contacts = extractor.extract_document(&document);
    let contact_page =
        find_contact_link(&document, &page.final_url).unwrap_or_else(|| page.final_url.clone());
    (contacts, contact_page)
}

async fn fetch_first(fetcher: &dyn PageFetcher, candidates: &[String]) -> Option<Page> {
    for candidate in candidates {
        match fetcher.fetch(candidate).await {
            Ok(page) => return Some(page),
            Err(e) => tracing::debug!(url = %candidate, error = %e, "Fetch failed"),
        }
    }
    None
}

/// Scrape one site: landing page, then its contact page when that is a
/// different URL. Contacts from both pages are merged.
pub async fn scrape_site(
    fetcher: &dyn PageFetcher,
    extractor: &ContactExtractor,
    url: &str,
) -> SiteReport {
    let candidates = candidate_urls(url);

    let Some(landing) = fetch_first(fetcher, &candidates).await else {
        tracing::info!(url, "Site not reachable");
        return SiteReport::unreachable(url);
    };

    let (mut contacts, contact_page) = analyze_landing(extractor, &landing);

    if contact_page != landing.final_url {
        match fetcher.fetch(contact_page.as_str()).await {
            Ok(page) => contacts.merge(extractor.extract(&page.html)),
            Err(e) => {
                tracing::debug!(url = %contact_page, error = %e, "Contact page fetch failed")
            }
        }
    }

    tracing::info!(
        url,
        contact_page = %contact_page,
        emails = contacts.emails.len(),
        phones = contacts.phones.len(),
        "Scraped site"
    );

    SiteReport {
        url: url.to_string(),
        emails: contacts.emails.into_iter().collect(),
        phones: contacts.phones.into_iter().collect(),
        error: None,
        contact_page: Some(contact_page.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::{HarvestError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned pages and records every URL requested.
    #[derive(Default)]
    pub(crate) struct CannedFetcher {
        pages: HashMap<String, Page>,
        pub requested: Mutex<Vec<String>>,
    }

    impl CannedFetcher {
        pub(crate) fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                Page {
                    html: html.to_string(),
                    final_url: Url::parse(url).unwrap(),
                },
            );
            self
        }

        pub(crate) fn with_redirect(mut self, url: &str, final_url: &str, html: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                Page {
                    html: html.to_string(),
                    final_url: Url::parse(final_url).unwrap(),
                },
            );
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<Page> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| HarvestError::NotFound(url.to_string()))
        }
    }

    /// Serves an empty page for any URL after a short delay, tracking the
    /// highest number of fetches in flight at once.
    #[derive(Default)]
    pub(crate) struct CountingFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CountingFetcher {
        pub(crate) fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<Page> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            Ok(Page {
                html: "<p>nothing here</p>".to_string(),
                final_url: Url::parse(url).map_err(|e| HarvestError::invalid_url(url, e))?,
            })
        }
    }

    #[test]
    fn test_candidate_urls() {
        assert_eq!(candidate_urls("http://a.com"), vec!["http://a.com"]);
        assert_eq!(
            candidate_urls(" https://a.com/x "),
            vec!["https://a.com/x", "http://a.com/x"]
        );
        assert_eq!(
            candidate_urls("a.com"),
            vec!["https://a.com", "http://a.com"]
        );
        assert_eq!(
            candidate_urls("HTTPS://A.com"),
            vec!["https://A.com", "http://A.com"]
        );
        assert!(candidate_urls("  ").is_empty());
    }

    #[tokio::test]
    async fn test_landing_and_contact_page_merged() {
        let fetcher = CannedFetcher::default()
            .with_page(
                "https://shop.example/",
                r#"<p>sales@shop.example</p><a href="/contact">Contact</a>"#,
            )
            .with_page(
                "https://shop.example/contact",
                r#"<a href="mailto:help@shop.example">mail</a><p>Phone: 0201234567</p>"#,
            );

        let report =
            scrape_site(&fetcher, &ContactExtractor::default(), "https://shop.example/").await;

        assert_eq!(report.error, None);
        assert_eq!(report.url, "https://shop.example/");
        assert_eq!(
            report.contact_page.as_deref(),
            Some("https://shop.example/contact")
        );
        assert_eq!(report.emails, vec!["help@shop.example", "sales@shop.example"]);
        assert_eq!(report.phones, vec!["0201234567"]);
    }

    #[tokio::test]
    async fn test_no_contact_link_uses_landing_page() {
        let fetcher =
            CannedFetcher::default().with_page("https://solo.example/", "<p>me@solo.example</p>");

        let report =
            scrape_site(&fetcher, &ContactExtractor::default(), "https://solo.example/").await;

        assert_eq!(report.contact_page.as_deref(), Some("https://solo.example/"));
        assert_eq!(report.emails, vec!["me@solo.example"]);
        // Landing page only, never fetched twice.
        assert_eq!(fetcher.requested(), vec!["https://solo.example/"]);
    }

    #[tokio::test]
    async fn test_https_falls_back_to_http() {
        let fetcher = CannedFetcher::default().with_page("http://old.example", "<p>x@old.example</p>");

        let report = scrape_site(&fetcher, &ContactExtractor::default(), "old.example").await;

        assert!(report.is_reachable());
        assert_eq!(report.url, "old.example");
        assert_eq!(report.emails, vec!["x@old.example"]);
        assert_eq!(
            fetcher.requested(),
            vec!["https://old.example", "http://old.example"]
        );
    }

    #[tokio::test]
    async fn test_http_input_does_not_retry() {
        let fetcher = CannedFetcher::default();

        let report = scrape_site(&fetcher, &ContactExtractor::default(), "http://down.example").await;

        assert_eq!(report, SiteReport::unreachable("http://down.example"));
        assert_eq!(fetcher.requested(), vec!["http://down.example"]);
    }

    #[tokio::test]
    async fn test_all_candidates_fail() {
        let fetcher = CannedFetcher::default();
        let report = scrape_site(&fetcher, &ContactExtractor::default(), "https://gone.example").await;

        assert_eq!(report.error.as_deref(), Some(UNREACHABLE));
        assert!(report.contact_page.is_none());
        assert!(report.emails.is_empty() && report.phones.is_empty());
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_contact_page_failure_keeps_landing_results() {
        let fetcher = CannedFetcher::default().with_page(
            "https://half.example/",
            r#"<p>a@half.example</p><a href="contact-us.html">c</a>"#,
        );

        let report =
            scrape_site(&fetcher, &ContactExtractor::default(), "https://half.example/").await;

        assert!(report.is_reachable());
        assert_eq!(report.emails, vec!["a@half.example"]);
        assert_eq!(
            report.contact_page.as_deref(),
            Some("https://half.example/contact-us.html")
        );
    }

    #[tokio::test]
    async fn test_contact_link_resolved_against_final_url() {
        let fetcher = CannedFetcher::default()
            .with_redirect(
                "https://brand.example",
                "https://www.brand.example/home/",
                r#"<a href="contact">c</a>"#,
            )
            .with_page("https://www.brand.example/home/contact", "<p>hi@brand.example</p>");

        let report =
            scrape_site(&fetcher, &ContactExtractor::default(), "https://brand.example").await;

        assert_eq!(
            report.contact_page.as_deref(),
            Some("https://www.brand.example/home/contact")
        );
        assert_eq!(report.emails, vec!["hi@brand.example"]);
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(SiteReport::unreachable("x.com")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "x.com",
                "emails": [],
                "phones": [],
                "error": "Site not reachable",
                "contact_page": null
            })
        );
    }
}

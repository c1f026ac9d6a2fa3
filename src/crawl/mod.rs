// Site crawling
//
// Fetch a site (https first, http fallback), follow its contact page and
// collect contacts from both. `Scraper` bundles the pieces the server and
// CLI share.

mod bulk;
mod fetcher;
mod site;

pub use bulk::{clean_urls, scrape_many};
pub use fetcher::{HttpFetcher, Page, PageFetcher};
pub use site::{candidate_urls, scrape_site, SiteReport, UNREACHABLE};

use std::sync::Arc;
use std::time::Instant;

use crate::config::ScraperConfig;
use crate::errors::Result;
use crate::extract::ContactExtractor;
use crate::metrics::Metrics;
use bulk::run_bounded;

/// Fetcher + extractor + concurrency limit, with optional metrics.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn PageFetcher>,
    extractor: ContactExtractor,
    concurrency: usize,
    metrics: Option<Metrics>,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, extractor: ContactExtractor, concurrency: usize) -> Self {
        Self {
            fetcher,
            extractor,
            concurrency: concurrency.max(1),
            metrics: None,
        }
    }

    /// Production scraper: HTTP fetcher and junk-domain list from config.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            ContactExtractor::new(&config.junk_email_domains),
            config.concurrency,
        ))
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scrape one site, recording metrics when attached.
    pub async fn scrape(&self, url: &str) -> SiteReport {
        let started = Instant::now();
        let report = scrape_site(self.fetcher.as_ref(), &self.extractor, url).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe(&report, started.elapsed());
        }
        report
    }

    /// Scrape many sites concurrently; reports keep input order.
    pub async fn scrape_many(&self, urls: Vec<String>) -> Vec<SiteReport> {
        run_bounded(urls, self.concurrency, |url| async move { self.scrape(&url).await }).await
    }
}

// Bulk scraping with bounded concurrency

use std::future::Future;

use futures::stream::{self, StreamExt};

use super::fetcher::PageFetcher;
use super::site::{scrape_site, SiteReport};
use crate::extract::ContactExtractor;

/// Trim inputs and drop blank entries.
pub fn clean_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .map(|u| u.as_ref().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// Scrape every URL, at most `concurrency` at a time. Reports come back
/// in input order.
pub async fn scrape_many(
    fetcher: &dyn PageFetcher,
    extractor: &ContactExtractor,
    urls: Vec<String>,
    concurrency: usize,
) -> Vec<SiteReport> {
    run_bounded(urls, concurrency, |url| async move {
        scrape_site(fetcher, extractor, &url).await
    })
    .await
}

/// Clean `urls` and run `scrape` on each, at most `concurrency` at a time,
/// collecting reports in input order.
pub(crate) async fn run_bounded<F, Fut>(
    urls: Vec<String>,
    concurrency: usize,
    scrape: F,
) -> Vec<SiteReport>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = SiteReport>,
{
    let urls = clean_urls(urls);
    let concurrency = concurrency.max(1);
    tracing::info!(sites = urls.len(), concurrency, "Starting bulk scrape");

    stream::iter(urls).map(scrape).buffered(concurrency).collect().await
}

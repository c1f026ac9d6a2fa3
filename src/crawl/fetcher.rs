// Page fetching over HTTP

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config::ScraperConfig;
use crate::errors::{HarvestError, Result};

/// A fetched HTML document and the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub html: String,
    pub final_url: Url,
}

/// Source of pages. `HttpFetcher` in production; tests swap in canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// reqwest-backed fetcher with a browser user agent and per-request timeout.
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// GET `url`, following redirects. The body is returned whatever the
    /// status code; an empty body counts as a failure.
    async fn fetch(&self, url: &str) -> Result<Page> {
        let parsed = Url::parse(url).map_err(|e| HarvestError::invalid_url(url, e))?;

        let resp = self.http.get(parsed).send().await?;
        let final_url = resp.url().clone();
        let status = resp.status();
        let html = resp.text().await?;

        tracing::debug!(url, final_url = %final_url, status = %status, bytes = html.len(), "Fetched page");

        if html.trim().is_empty() {
            return Err(HarvestError::EmptyBody(final_url.to_string()));
        }

        Ok(Page { html, final_url })
    }
}

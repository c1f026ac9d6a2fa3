// Metrics module
// Prometheus counters for scrape outcomes, exposed at GET /metrics

use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

use crate::crawl::SiteReport;
use crate::errors::Result;

/// Scrape metrics backed by a private registry (one per server instance).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    sites: IntCounterVec,
    contacts: IntCounterVec,
    scrape_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let sites = IntCounterVec::new(
            Opts::new("harvest_sites_total", "Sites scraped, by outcome"),
            &["outcome"],
        )?;
        let contacts = IntCounterVec::new(
            Opts::new("harvest_contacts_total", "Contact details found, by kind"),
            &["kind"],
        )?;
        let scrape_seconds = Histogram::with_opts(
            HistogramOpts::new("harvest_scrape_seconds", "Time spent scraping one site")
                .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]),
        )?;

        registry.register(Box::new(sites.clone()))?;
        registry.register(Box::new(contacts.clone()))?;
        registry.register(Box::new(scrape_seconds.clone()))?;

        Ok(Self {
            registry,
            sites,
            contacts,
            scrape_seconds,
        })
    }

    /// Record one finished site scrape
    pub fn observe(&self, report: &SiteReport, elapsed: Duration) {
        let outcome = if report.is_reachable() {
            "reachable"
        } else {
            "unreachable"
        };
        self.sites.with_label_values(&[outcome]).inc();
        self.contacts
            .with_label_values(&["email"])
            .inc_by(report.emails.len() as u64);
        self.contacts
            .with_label_values(&["phone"])
            .inc_by(report.phones.len() as u64);
        self.scrape_seconds.observe(elapsed.as_secs_f64());
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }

    pub fn sites_total(&self, outcome: &str) -> u64 {
        self.sites.with_label_values(&[outcome]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(reachable: bool, emails: usize) -> SiteReport {
        let mut r = SiteReport::unreachable("x.example");
        if reachable {
            r.error = None;
            r.emails = (0..emails).map(|i| format!("u{i}@x.example")).collect();
            r.phones = vec!["0123456".to_string()];
        }
        r
    }

    #[test]
    fn test_observe_counts_outcomes() {
        let metrics = Metrics::new().unwrap();
        metrics.observe(&report(true, 2), Duration::from_millis(120));
        metrics.observe(&report(false, 0), Duration::from_millis(30));
        metrics.observe(&report(true, 1), Duration::from_millis(80));

        assert_eq!(metrics.sites_total("reachable"), 2);
        assert_eq!(metrics.sites_total("unreachable"), 1);
    }

    #[test]
    fn test_render_contains_series() {
        let metrics = Metrics::new().unwrap();
        metrics.observe(&report(true, 3), Duration::from_millis(10));
        let text = metrics.render().unwrap();

        assert!(text.contains("harvest_sites_total{outcome=\"reachable\"} 1"));
        assert!(text.contains("harvest_contacts_total{kind=\"email\"} 3"));
        assert!(text.contains("harvest_scrape_seconds_count 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.observe(&report(true, 0), Duration::ZERO);
        assert_eq!(a.sites_total("reachable"), 1);
        assert_eq!(b.sites_total("reachable"), 0);
    }
}

// Harvest - website contact extraction service
// Library exports

pub mod config;
pub mod crawl;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod server;

pub use errors::{HarvestError, Result};

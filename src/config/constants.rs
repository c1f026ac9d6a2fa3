// Project-wide constants
//
// Centralised here so port numbers and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Default bind address for the HTTP service (all interfaces).
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

/// User agent sent with every site request. Some hosts refuse
/// requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Per-request timeout when fetching a site.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Sites scraped in parallel during a bulk run.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Directory bulk CSV results are written to.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Request body limit (covers CSV uploads).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Email domains that belong to error-reporting services embedded in
/// site builders, not to the site owner.
pub const DEFAULT_JUNK_EMAIL_DOMAINS: &[&str] = &[
    "sentry.wixpress.com",
    "sentry.io",
    "sentry-next.wixpress.com",
];

/// Default tracing filter when RUST_LOG is unset.
pub const DEFAULT_LOG_FILTER: &str = "harvest=info,tower_http=info";

/// Prefix for environment overrides, e.g. `HARVEST_SERVER__BIND_ADDRESS`.
pub const ENV_PREFIX: &str = "HARVEST";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "harvest.toml";

// Middleware: per-IP rate limiting

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::ApiError;
use crate::config::ServerConfig;

/// Buckets idle this long are dropped by the purge task.
pub const IDLE_BUCKET_SECS: u64 = 600;

// ---------------------------------------------------------------------------
// Rate limiter: token bucket per client IP
// ---------------------------------------------------------------------------

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Shared limiter state; cloning shares the buckets.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<IpAddr, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiter {
    /// `requests_per_second` sustained, up to `burst` at once.
    pub fn new(requests_per_second: f64, burst: f64) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            capacity: burst,
            refill_per_sec: requests_per_second,
        }
    }

    /// Limiter for the configured server, or `None` when disabled.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        config
            .rate_limit_enabled
            .then(|| Self::new(config.requests_per_second, config.burst))
    }

    /// Consume one token for `ip`; false when the bucket is empty.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut bucket = self.buckets.entry(ip).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets idle for longer than `idle`.
    pub fn purge_idle(&self, idle: Duration) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_refill) < idle);
    }

    pub fn tracked_ips(&self) -> usize {
        self.buckets.len()
    }

    /// Background task that purges idle buckets every minute.
    pub fn spawn_purge_task(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(60));
            loop {
                tick.tick().await;
                limiter.purge_idle(Duration::from_secs(IDLE_BUCKET_SECS));
                tracing::trace!(tracked = limiter.tracked_ips(), "Purged idle rate-limit buckets");
            }
        })
    }
}

/// Rejects requests with 429 once the client's bucket is exhausted.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request).unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if limiter.check(ip) {
        next.run(request).await
    } else {
        tracing::warn!(ip = %ip, "Rate limit exceeded");
        ApiError::new(StatusCode::TOO_MANY_REQUESTS, "Too many requests").into_response()
    }
}

/// Leftmost X-Forwarded-For entry, else the peer address.
fn client_ip(request: &Request) -> Option<IpAddr> {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

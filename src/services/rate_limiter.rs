// src/services/rate_limiter.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::http::HeaderMap;
use tokio::sync::Mutex;

/// Key used when the caller sent no usable forwarded address.
pub const FALLBACK_CLIENT_KEY: &str = "unknown";

#[derive(Clone, Debug)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

/// Fixed-window request counter keyed by client.
///
/// State is process-local: separate relay instances keep independent counts.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

impl Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish()
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request for `key` and report whether it is over the limit.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut guard = self.inner.lock().await;
        let entry = guard
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry { count: 0, reset_at: now + self.window });
        if now > entry.reset_at {
            // Stale window: start over.
            entry.count = 0;
            entry.reset_at = now + self.window;
        }
        entry.count = entry.count.saturating_add(1);
        entry.count > self.max_requests
    }

    /// Remove entries whose window has elapsed. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now()).await
    }

    pub async fn purge_expired_at(&self, now: Instant) -> usize {
        let mut guard = self.inner.lock().await;
        let before = guard.len();
        guard.retain(|_, entry| now <= entry.reset_at);
        before - guard.len()
    }

    /// Number of tracked client keys
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

/// First address of `x-forwarded-for`, or [`FALLBACK_CLIENT_KEY`].
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|raw| raw.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .unwrap_or(FALLBACK_CLIENT_KEY)
        .to_string()
}

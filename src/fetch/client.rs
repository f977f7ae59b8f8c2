// src/fetch/client.rs
// =============================================================================
// The remote fetch client: "GET this URL, give me the body or nothing".
//
// Key functionality:
// - A process-wide semaphore caps how many requests are in flight at once.
//   This is the only thing stopping a big tree from opening thousands of
//   connections to the service at the same time.
// - Each attempt has its own deadline (tokio::time::timeout).
// - Failed attempts (network error, non-2xx, timeout, blank body) are retried
//   after a short fixed pause, up to max_attempts.
// - After the last attempt we return None instead of an error. One missing
//   person or family is never a reason to stop the crawl.
//
// The actual HTTP call sits behind the Transport trait so the traversal
// tests can run against an in-memory server.
//
// Rust concepts:
// - Traits: The Transport "interface" with a reqwest implementation
// - Semaphore permits: Released automatically when the permit is dropped
// - Atomics: Lock-free request counters shared by all tasks
// =============================================================================

use super::error::{categorize, FetchError};
use crate::config::CrawlConfig;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

/// Something that can perform a single GET
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// The real transport: one shared reqwest client (connection pooling)
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| categorize(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| categorize(e, self.timeout))
    }
}

// Counters for what actually went over the wire
#[derive(Debug, Default)]
struct FetchStats {
    requests: AtomicUsize,
    failures: AtomicUsize,
}

/// Throttled, retrying GET client
pub struct FetchClient<T> {
    transport: T,
    throttle: Arc<Semaphore>,
    timeout: Duration,
    max_attempts: u32,
    retry_delay: Duration,
    stats: FetchStats,
}

impl<T: Transport> FetchClient<T> {
    pub fn new(transport: T, config: &CrawlConfig) -> Self {
        Self::with_throttle(transport, config, Arc::new(Semaphore::new(config.concurrency)))
    }

    // Lets several clients draw from one throttle
    pub fn with_throttle(transport: T, config: &CrawlConfig, throttle: Arc<Semaphore>) -> Self {
        Self {
            transport,
            throttle,
            timeout: config.timeout,
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
            stats: FetchStats::default(),
        }
    }

    /// Fetches the body at `url`, retrying on failure. None once every
    /// attempt has failed or a permanent error was hit.
    pub async fn fetch(&self, url: &Url) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(url).await {
                // Got a non-blank body, we are done
                Ok(body) => {
                    debug!(%url, attempt, "fetched");
                    return Some(body);
                }
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    warn!(%url, attempt, error = %e, "attempt failed, retrying");
                    // Sleep without holding a permit so others can use it
                    tokio::time::sleep(self.retry_delay).await;
                }
                // Last attempt, or an error that retrying cannot fix
                Err(e) => {
                    warn!(%url, attempt, error = %e, "giving up");
                    return None;
                }
            }
        }

        None
    }

    // One throttled attempt. The permit lives until the end of this
    // function, whichever way it returns.
    async fn attempt(&self, url: &Url) -> Result<String, FetchError> {
        let _permit = self
            .throttle
            .acquire()
            .await
            .map_err(|_| FetchError::ThrottleClosed)?;

        self.stats.requests.fetch_add(1, Ordering::Relaxed);

        // The deadline covers the whole attempt: connect, headers and body
        let result = match tokio::time::timeout(self.timeout, self.transport.get(url)).await {
            Ok(Ok(body)) if body.trim().is_empty() => Err(FetchError::Empty),
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        if result.is_err() {
            self.stats.failures.fetch_add(1, Ordering::Relaxed);
        }

        result
    }

    /// Number of attempts that reached the transport
    pub fn requests(&self) -> usize {
        self.stats.requests.load(Ordering::Relaxed)
    }

    /// Number of attempts that failed
    pub fn failed_attempts(&self) -> usize {
        self.stats.failures.load(Ordering::Relaxed)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

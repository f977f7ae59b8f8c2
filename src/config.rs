// src/config.rs
// =============================================================================
// Crawl configuration: every knob that controls how we talk to the remote
// genealogy service.
//
// Nothing here is business logic. The defaults match the service we were
// built against (local server on port 8123, 500 concurrent requests, 5 tries
// per request, 100ms between tries, 3 minute deadline per request), but all
// of them can be overridden from the command line.
//
// Rust concepts:
// - Default trait: A "zero-argument constructor" with sensible values
// - Duration: Type-safe time spans instead of raw integers
// =============================================================================

use anyhow::{anyhow, Result};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8123";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_CONCURRENCY: usize = 500;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Root of the service; always ends with '/' so `join` appends to it
    pub base_url: Url,
    /// Overall deadline for one request attempt
    pub timeout: Duration,
    /// How many times a single resource is requested before giving up
    pub max_attempts: u32,
    /// Pause between two attempts on the same resource
    pub retry_delay: Duration,
    /// Maximum number of requests in flight across the whole process
    pub concurrency: usize,
}

impl CrawlConfig {
    // Builds a validated config
    //
    // Fails if the base URL does not parse, is not http(s), or if a limit
    // is zero (zero attempts would never fetch, zero permits would hang,
    // a zero deadline would time out every request). The concurrency cap is
    // also bounded above by what tokio's Semaphore can hold.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        max_attempts: u32,
        retry_delay: Duration,
        concurrency: usize,
    ) -> Result<Self> {
        if max_attempts == 0 {
            return Err(anyhow!("max attempts must be at least 1"));
        }
        if concurrency == 0 {
            return Err(anyhow!("concurrency limit must be at least 1"));
        }
        if concurrency > Semaphore::MAX_PERMITS {
            return Err(anyhow!(
                "concurrency limit must be at most {}",
                Semaphore::MAX_PERMITS
            ));
        }
        if timeout.is_zero() {
            return Err(anyhow!("request timeout must be greater than zero"));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout,
            max_attempts,
            retry_delay,
            concurrency,
        })
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: normalize_base_url(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

// Parses the base URL and makes sure its path ends with '/'
//
// Url::join treats the last path segment as a "file" and replaces it,
// so "http://host/api" + "person/1" would become "http://host/person/1".
// With the trailing slash we get "http://host/api/person/1" as expected.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| anyhow!("Invalid base URL '{}': {}", raw, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("Base URL must be http or https: {}", raw));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

// src/testing.rs
// =============================================================================
// Test doubles: an in-memory genealogy "server".
//
// MapTransport answers GETs from a map of path -> JSON body, and records
// what it was asked for so tests can assert on request counts. It can also:
// - add latency to every response (to make traversal branches overlap)
// - fail the next N requests for a path with a 503
// - report the highest number of requests it ever saw in flight at once
//
// Paths are relative to the server root, e.g. "person/3" or "family/1".
// Unknown paths answer 404.
// =============================================================================

use crate::config::CrawlConfig;
use crate::fetch::{EntityFetcher, FetchClient, FetchError, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Default)]
pub struct MapTransport {
    bodies: HashMap<String, String>,
    latency: Duration,
    failures: Mutex<HashMap<String, usize>>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

// Decrements the in-flight counter even if the request future is dropped
// by a timeout halfway through.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MapTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(path.to_string(), body.to_string());
        self
    }

    pub fn with_person(self, id: u64, parent_id: u64) -> Self {
        let body = format!(r#"{{"id": {}, "name": "Person {}", "parent_id": {}}}"#, id, id, parent_id);
        self.with_body(&format!("person/{}", id), &body)
    }

    pub fn with_family(self, id: u64, husband_id: u64, wife_id: u64, children: &[u64]) -> Self {
        let body = format!(
            r#"{{"id": {}, "husband_id": {}, "wife_id": {}, "children": {:?}}}"#,
            id, husband_id, wife_id, children
        );
        self.with_body(&format!("family/{}", id), &body)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_next(&self, path: &str, count: usize) {
        self.failures.lock().unwrap().insert(path.to_string(), count);
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Every path that was requested at least once
    pub fn requested_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.calls.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MapTransport {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let path = url.path().trim_start_matches('/').to_string();
        *self.calls.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&path) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::Status(503));
                }
            }
        }

        self.bodies
            .get(&path)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// Test config: fast retries, short deadline
pub fn test_config() -> CrawlConfig {
    CrawlConfig {
        retry_delay: Duration::from_millis(1),
        timeout: Duration::from_secs(2),
        concurrency: 16,
        ..CrawlConfig::default()
    }
}

pub fn fetcher(transport: MapTransport) -> EntityFetcher<MapTransport> {
    let config = test_config();
    EntityFetcher::new(FetchClient::new(transport, &config), config.base_url)
}

/// A complete ancestor tree, `generations` families deep.
///
/// Families are numbered like a binary heap: family f has husband person
/// 2f and wife person 2f+1. Person p (p < 2^generations) is the child of
/// family p, so the husband of f is the child of family 2f and the wife is
/// the child of family 2f+1. Every family also has one extra child,
/// person 1000+f. The top spouses have no parents.
///
/// generations = g gives 2^g - 1 families and 2^(g+1) - 1 + (2^g - 1) persons.
pub fn pedigree(generations: u32) -> MapTransport {
    let families = (1u64 << generations) - 1;
    let mut transport = MapTransport::new();

    for f in 1..=families {
        transport = transport
            .with_family(f, 2 * f, 2 * f + 1, &[f, 1000 + f])
            .with_person(1000 + f, f);
    }
    for p in 1..=(2 * families + 1) {
        let parent = if p <= families { p } else { 0 };
        transport = transport.with_person(p, parent);
    }

    transport
}

// src/fetch/error.rs
// =============================================================================
// Why a single request attempt failed.
//
// These errors never leave the fetch module: the client logs them, retries,
// and finally reports "no data" (None) to the caller. They exist so the log
// line says something more useful than "failed".
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, broken body, ...
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered, but not with a 2xx
    #[error("HTTP {0}")]
    Status(u16),

    /// 2xx with a body that is empty or only whitespace
    #[error("empty response")]
    Empty,

    /// The attempt did not finish within the configured deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The concurrency throttle was shut down; retrying cannot help
    #[error("request throttle closed")]
    ThrottleClosed,
}

impl FetchError {
    // A closed throttle and a definite client error (404 and friends) are
    // permanent. Everything else may succeed on the next attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::ThrottleClosed => false,
            // 408 Request Timeout and 429 Too Many Requests are worth retrying
            FetchError::Status(code) => !(400..500).contains(code) || *code == 408 || *code == 429,
            _ => true,
        }
    }
}

// Maps a reqwest error to our variants
//
// reqwest reports its own client-level timeout as an ordinary error; we
// surface it as Timeout so it reads the same as our tokio deadline.
pub fn categorize(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Request(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(FetchError::Status(500).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(FetchError::Status(429).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::Status(410).is_retryable());
        assert!(FetchError::Empty.is_retryable());
        assert!(FetchError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!FetchError::ThrottleClosed.is_retryable());
    }
}

//! Absolute wall-clock budget for one check run.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::transport::TransportError;

/// Fallback horizon when `now + timeout` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Run `operation` unless the deadline has already passed, and abandon
    /// it if the deadline passes while it is pending.
    pub async fn guard<T, F>(&self, operation: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        if self.is_expired() {
            return Err(TransportError::DeadlineExceeded);
        }
        tokio::time::timeout_at(self.at, operation)
            .await
            .map_err(|_| TransportError::DeadlineExceeded)?
    }
}

//! Wall-clock limit and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Stop condition polled by the simplex loop (every pivot) and the
/// branch-and-cut loop (every node).
///
/// Expiry is soft: the current pivot or node finishes before the search
/// notices.
#[derive(Debug, Clone)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Deadline {
    /// Starts the clock now.
    pub fn new(limit_ms: Option<u64>, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            start: Instant::now(),
            limit: limit_ms.map(Duration::from_millis),
            cancel,
        }
    }

    /// A deadline that never expires.
    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether the cancellation flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Whether the time limit has passed or the call was cancelled.
    pub fn is_expired(&self) -> bool {
        self.is_cancelled() || self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_expires() {
        let deadline = Deadline::unlimited();
        assert!(!deadline.is_expired());
        assert!(!deadline.is_cancelled());
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let deadline = Deadline::new(None, Some(flag.clone()));
        assert!(!deadline.is_expired());
        flag.store(true, Ordering::Relaxed);
        assert!(deadline.is_cancelled());
        assert!(deadline.is_expired());
    }

    #[test]
    fn test_time_limit() {
        let deadline = Deadline::new(Some(1), None);
        std::thread::sleep(Duration::from_millis(5));
        assert!(deadline.is_expired());
        assert!(deadline.elapsed_ms() >= 1);
    }
}

//! Node and time limits.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Nodes between wall-clock checks.
const TIME_CHECK_INTERVAL: u64 = 4096;

/// Nodes a parallel worker counts locally before publishing them.
const SHARED_FLUSH_INTERVAL: u64 = 256;

/// Stop flag shared by every worker of one solve.
///
/// `cancel` is the caller's token; setting it stops the search as if a
/// limit had fired, with reason `"cancelled"`.
#[derive(Debug, Default)]
pub(crate) struct StopSignal {
    raised: AtomicBool,
    reason: Mutex<Option<String>>,
    nodes: AtomicU64,
    cancel: Option<Arc<AtomicBool>>,
}

impl StopSignal {
    pub fn new(cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            cancel,
            ..Self::default()
        }
    }

    #[inline]
    fn cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn raise(&self, reason: String) {
        let mut slot = self.reason.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(reason);
        }
        self.raised.store(true, Ordering::Release);
    }

    #[inline]
    fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Reason of the first limit that fired, if any.
    pub fn reason(&self) -> Option<String> {
        self.reason.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Per-worker limit checker.
///
/// A sequential search owns the whole node count and checks the node
/// limit exactly. Parallel workers publish their counts to the shared
/// [`StopSignal`] in batches, so the limit may be overshot by a few
/// hundred nodes per worker.
pub(crate) struct Budget<'a> {
    node_limit: u64,
    deadline: Option<Instant>,
    signal: &'a StopSignal,
    shared: bool,
    local: u64,
    unpublished: u64,
}

impl<'a> Budget<'a> {
    pub fn new(
        node_limit: u64,
        time_limit: Option<Duration>,
        started: Instant,
        signal: &'a StopSignal,
        shared: bool,
    ) -> Self {
        Self {
            node_limit,
            deadline: time_limit.map(|d| started + d),
            signal,
            shared,
            local: 0,
            unpublished: 0,
        }
    }

    /// Called before expanding a node. Returns `true` when the search
    /// must stop.
    pub fn exhausted(&mut self) -> bool {
        if self.signal.is_raised() {
            return true;
        }
        if self.signal.cancel_requested() {
            self.signal.raise("cancelled".into());
            return true;
        }

        let total = if self.shared {
            self.unpublished += 1;
            if self.unpublished >= SHARED_FLUSH_INTERVAL {
                let before = self.signal.nodes.fetch_add(self.unpublished, Ordering::Relaxed);
                self.unpublished = 0;
                before + SHARED_FLUSH_INTERVAL
            } else {
                self.signal.nodes.load(Ordering::Relaxed) + self.unpublished
            }
        } else {
            self.local + 1
        };

        if self.node_limit > 0 && total > self.node_limit {
            self.signal
                .raise(format!("node limit {} reached", self.node_limit));
            return true;
        }

        self.local += 1;
        if self.local % TIME_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.signal.raise("time limit reached".into());
                    return true;
                }
            }
        }
        false
    }

    /// Publishes the remaining local count (parallel workers).
    pub fn flush(&mut self) {
        if self.shared && self.unpublished > 0 {
            self.signal
                .nodes
                .fetch_add(self.unpublished, Ordering::Relaxed);
            self.unpublished = 0;
        }
    }

    /// Checks the deadline immediately.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub fn past_deadline(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.signal.raise("time limit reached".into());
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_exhausts() {
        let signal = StopSignal::new(None);
        let mut budget = Budget::new(0, None, Instant::now(), &signal, false);
        for _ in 0..10_000 {
            assert!(!budget.exhausted());
        }
        assert!(signal.reason().is_none());
    }

    #[test]
    fn test_node_limit_exact_when_sequential() {
        let signal = StopSignal::new(None);
        let mut budget = Budget::new(5, None, Instant::now(), &signal, false);
        for _ in 0..5 {
            assert!(!budget.exhausted());
        }
        assert!(budget.exhausted());
        assert_eq!(signal.reason().as_deref(), Some("node limit 5 reached"));
    }

    #[test]
    fn test_raised_signal_stops_other_workers() {
        let signal = StopSignal::new(None);
        let mut a = Budget::new(1, None, Instant::now(), &signal, false);
        let mut b = Budget::new(0, None, Instant::now(), &signal, false);
        assert!(!a.exhausted());
        assert!(a.exhausted());
        assert!(b.exhausted());
    }

    #[test]
    fn test_expired_deadline() {
        let signal = StopSignal::new(None);
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(5));
        let budget = Budget::new(0, Some(Duration::from_millis(1)), started, &signal, false);
        assert!(budget.past_deadline());
        assert_eq!(signal.reason().as_deref(), Some("time limit reached"));
    }

    #[test]
    fn test_cancel_token_stops_search() {
        let token = Arc::new(AtomicBool::new(false));
        let signal = StopSignal::new(Some(Arc::clone(&token)));
        let mut budget = Budget::new(0, None, Instant::now(), &signal, false);
        assert!(!budget.exhausted());
        token.store(true, Ordering::Relaxed);
        assert!(budget.exhausted());
        assert_eq!(signal.reason().as_deref(), Some("cancelled"));
    }

    #[test]
    fn test_shared_counts_are_published() {
        let signal = StopSignal::new(None);
        let mut budget = Budget::new(0, None, Instant::now(), &signal, true);
        for _ in 0..300 {
            budget.exhausted();
        }
        budget.flush();
        assert_eq!(signal.nodes.load(Ordering::Relaxed), 300);
    }
}

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed and has been recorded against the client's quota
    Admitted,

    /// The client has used its quota for the current window
    Rejected {
        /// Time until the oldest recorded request leaves the window
        retry_after: Duration,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Log-based sliding-window rate limiter keyed by client
///
/// Each client owns a log of the instants at which its requests were admitted.
/// The log is pruned to the trailing window on every check, so the quota frees
/// up gradually rather than at fixed boundaries.
///
/// The map is sharded; a check holds the lock of one shard for the duration of
/// the prune-count-append step, so updates for a single client are atomic and
/// clients in different shards never contend.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    logs: DashMap<String, VecDeque<Instant>>,
    max_requests: u32,
    window: Duration,
}

impl SlidingWindowLimiter {
    /// Creates a limiter allowing `max_requests` per `window` for each client
    ///
    /// `max_requests` and `window` are expected to be positive; configuration
    /// validation enforces this before a limiter is built.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            logs: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Checks whether a request from `key` at `now` may proceed
    ///
    /// # Algorithm
    ///
    /// 1. Drop every logged instant at least one window older than `now`
    /// 2. If the remaining count plus this request exceeds the quota, reject
    ///    without recording the attempt
    /// 3. Otherwise record `now` and admit
    ///
    /// # Arguments
    ///
    /// * `key` - The client identifier
    /// * `now` - The current instant
    ///
    /// # Returns
    ///
    /// `Admission::Admitted`, or `Admission::Rejected` with a retry hint
    pub fn admit(&self, key: &str, now: Instant) -> Admission {
        let mut log = self.logs.entry(key.to_string()).or_default();

        prune(&mut log, now, self.window);

        if log.len() as u64 + 1 > u64::from(self.max_requests) {
            let retry_after = log
                .front()
                .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
                .unwrap_or(self.window);

            tracing::warn!(
                client = key,
                in_window = log.len(),
                max_requests = self.max_requests,
                "Rate limit exceeded"
            );
            return Admission::Rejected { retry_after };
        }

        log.push_back(now);
        tracing::debug!(
            client = key,
            in_window = log.len(),
            max_requests = self.max_requests,
            "Request admitted"
        );
        Admission::Admitted
    }

    /// Number of requests currently counted against `key`
    ///
    /// Does not prune, so entries that have aged out since the last check are
    /// still included.
    pub fn recorded(&self, key: &str) -> usize {
        self.logs.get(key).map(|log| log.len()).unwrap_or(0)
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.logs.len()
    }

    /// Drops every client whose log is empty once pruned at `now`
    ///
    /// # Returns
    ///
    /// The number of clients evicted
    pub fn evict_idle(&self, now: Instant) -> usize {
        let before = self.logs.len();
        self.logs.retain(|_, log| {
            prune(log, now, self.window);
            !log.is_empty()
        });
        let evicted = before.saturating_sub(self.logs.len());

        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.logs.len(), "Evicted idle clients");
        }
        evicted
    }
}

/// Removes instants that are at least `window` older than `now`
fn prune(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = log.front() {
        if now.saturating_duration_since(*oldest) >= window {
            log.pop_front();
        } else {
            break;
        }
    }
}

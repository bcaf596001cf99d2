//! In-process fixed-window rate limiting.
//!
//! Counters are keyed by `(identity, endpoint class)` and live in process
//! memory only: when the service runs as several instances each keeps its own
//! counts, so enforcement is best-effort rather than globally consistent.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Wall-clock source, swappable so tests can drive the window forward
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Endpoint classes with their own limit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    Search,
}

/// Limit for one endpoint class: at most `max_requests` per `window`
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Rejected { retry_after: Duration },
}

struct WindowCounter {
    window_start: Instant,
    count: u32,
}

struct CounterStore {
    counters: HashMap<(String, EndpointClass), WindowCounter>,
    last_sweep: Instant,
}

/// Fixed-window counter store keyed by `(identity, endpoint class)`.
///
/// The window resets by elapsed wall-clock time, never by request count.
/// Identities include caller-supplied origins, so expired windows are swept
/// out periodically to keep the map bounded.
pub struct FixedWindowLimiter {
    policies: HashMap<EndpointClass, RateLimitPolicy>,
    store: Mutex<CounterStore>,
    sweep_interval: Duration,
    clock: Box<dyn Clock>,
}

/// Rate-limit identity for a request: the authenticated user id when there
/// is one, otherwise the request-origin address.
pub fn identity_for(user_id: Option<&str>, remote_addr: &str) -> String {
    match user_id {
        Some(id) => format!("user:{}", id),
        None => format!("ip:{}", remote_addr),
    }
}

impl FixedWindowLimiter {
    pub fn new(policies: HashMap<EndpointClass, RateLimitPolicy>) -> Self {
        Self::with_clock(policies, Box::new(SystemClock))
    }

    pub fn with_clock(
        policies: HashMap<EndpointClass, RateLimitPolicy>,
        clock: Box<dyn Clock>,
    ) -> Self {
        // Sweeping once per longest window is enough: any entry older than
        // its own window is dead weight by then
        let sweep_interval = policies
            .values()
            .map(|p| p.window)
            .max()
            .unwrap_or(Duration::from_secs(60));
        let last_sweep = clock.now();

        Self {
            policies,
            store: Mutex::new(CounterStore {
                counters: HashMap::new(),
                last_sweep,
            }),
            sweep_interval,
            clock,
        }
    }

    /// Record one request and decide whether it is within the limit.
    pub fn check(&self, identity: &str, class: EndpointClass) -> RateLimitDecision {
        let Some(policy) = self.policies.get(&class) else {
            // No policy configured for this class means no limit
            return RateLimitDecision::Allowed { remaining: u32::MAX };
        };

        let now = self.clock.now();
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());

        if now.duration_since(store.last_sweep) >= self.sweep_interval {
            store.counters.retain(|(_, class), counter| {
                self.policies
                    .get(class)
                    .is_some_and(|p| now.duration_since(counter.window_start) < p.window)
            });
            store.last_sweep = now;
        }

        let counter = store
            .counters
            .entry((identity.to_string(), class))
            .or_insert(WindowCounter {
                window_start: now,
                count: 0,
            });

        // A fully elapsed window starts over
        if now.duration_since(counter.window_start) >= policy.window {
            counter.window_start = now;
            counter.count = 0;
        }

        if counter.count >= policy.max_requests {
            let elapsed = now.duration_since(counter.window_start);
            let retry_after = policy.window.saturating_sub(elapsed);
            return RateLimitDecision::Rejected { retry_after };
        }

        counter.count += 1;
        RateLimitDecision::Allowed {
            remaining: policy.max_requests - counter.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    struct FakeClock {
        now: Arc<Mutex<Instant>>,
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn limiter(max_requests: u32, window_secs: u64) -> (FixedWindowLimiter, Arc<Mutex<Instant>>) {
        let now = Arc::new(Mutex::new(Instant::now()));
        let clock = FakeClock { now: now.clone() };
        let mut policies = HashMap::new();
        policies.insert(
            EndpointClass::Search,
            RateLimitPolicy {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
        );
        (
            FixedWindowLimiter::with_clock(policies, Box::new(clock)),
            now,
        )
    }

    fn advance(now: &Arc<Mutex<Instant>>, duration: Duration) {
        let mut guard = now.lock().unwrap();
        *guard += duration;
    }

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let (limiter, _now) = limiter(3, 60);

        for _ in 0..3 {
            assert!(matches!(
                limiter.check("user:alice", EndpointClass::Search),
                RateLimitDecision::Allowed { .. }
            ));
        }

        match limiter.check("user:alice", EndpointClass::Search) {
            RateLimitDecision::Rejected { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn window_resets_by_elapsed_time_not_request_count() {
        let (limiter, now) = limiter(2, 60);

        limiter.check("user:alice", EndpointClass::Search);
        limiter.check("user:alice", EndpointClass::Search);
        assert!(matches!(
            limiter.check("user:alice", EndpointClass::Search),
            RateLimitDecision::Rejected { .. }
        ));

        // Still inside the window: rejected regardless of how many came before
        advance(&now, Duration::from_secs(30));
        assert!(matches!(
            limiter.check("user:alice", EndpointClass::Search),
            RateLimitDecision::Rejected { .. }
        ));

        // Window elapsed: admitted again
        advance(&now, Duration::from_secs(30));
        assert!(matches!(
            limiter.check("user:alice", EndpointClass::Search),
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[test]
    fn identities_are_tracked_independently() {
        let (limiter, _now) = limiter(1, 60);

        assert!(matches!(
            limiter.check("user:alice", EndpointClass::Search),
            RateLimitDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("user:alice", EndpointClass::Search),
            RateLimitDecision::Rejected { .. }
        ));
        // A different identity has its own window
        assert!(matches!(
            limiter.check("ip:10.0.0.7", EndpointClass::Search),
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[test]
    fn retry_after_shrinks_as_the_window_ages() {
        let (limiter, now) = limiter(1, 60);

        limiter.check("user:alice", EndpointClass::Search);
        advance(&now, Duration::from_secs(45));

        match limiter.check("user:alice", EndpointClass::Search) {
            RateLimitDecision::Rejected { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(15));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn expired_windows_are_swept_out_of_the_store() {
        let (limiter, now) = limiter(1, 60);

        // One counter per spoofed origin
        for i in 0..50 {
            limiter.check(&format!("ip:203.0.113.{}", i), EndpointClass::Search);
        }
        assert_eq!(limiter.store.lock().unwrap().counters.len(), 50);

        // Once every window has elapsed, the next check discards them all
        advance(&now, Duration::from_secs(61));
        limiter.check("ip:198.51.100.1", EndpointClass::Search);

        let store = limiter.store.lock().unwrap();
        assert_eq!(store.counters.len(), 1);
        assert!(store.counters.keys().all(|(id, _)| id == "ip:198.51.100.1"));
    }

    #[test]
    fn identity_prefers_user_id_over_origin() {
        assert_eq!(identity_for(Some("u-1"), "10.0.0.7"), "user:u-1");
        assert_eq!(identity_for(None, "10.0.0.7"), "ip:10.0.0.7");
    }
}

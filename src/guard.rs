//! Guard Module
//!
//! Composes the rate limiter, the bounded cache, and the retry executor
//! into the call sequence the dashboard uses around every expensive remote
//! operation: limiter check, cache lookup, retried execution, cache fill.
//!
//! Guards are explicitly constructed instances; hosts build one per value
//! type, inject it where needed, and own its shutdown (abort the sweep task
//! spawned against its handles). Nothing here is process-global, so tests
//! get isolated instances for free.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{BoundedCache, CacheStats};
use crate::config::GuardConfig;
use crate::error::{ClassifiedError, ErrorKind, RawFailure, Result};
use crate::limiter::RateLimiter;
use crate::retry::{ErrorClassifier, RetryExecutor};

// == Guard ==
/// Resource-protection facade around expensive remote calls.
///
/// Cache keys are deterministic string fingerprints of the request (e.g.
/// `"<subject_id>|<analysis_kind>"`); identities are opaque principal
/// strings. The guard is agnostic to how either is produced.
#[derive(Clone)]
pub struct Guard<V> {
    /// Memoized results keyed by request fingerprint
    cache: Arc<RwLock<BoundedCache<String, V>>>,
    /// One independent limiter per registered action class
    limiters: Arc<RwLock<HashMap<String, RateLimiter>>>,
    /// Retry policy shared by every guarded call
    executor: RetryExecutor,
    /// Total attempts per guarded call
    max_attempts: u32,
}

impl<V: Clone> Guard<V> {
    // == Constructor ==
    /// Creates a guard with the given cache bounds and retry executor.
    pub fn new(cache_capacity: usize, default_ttl: Duration, executor: RetryExecutor, max_attempts: u32) -> Self {
        Self {
            cache: Arc::new(RwLock::new(BoundedCache::new(cache_capacity, default_ttl))),
            limiters: Arc::new(RwLock::new(HashMap::new())),
            executor,
            max_attempts,
        }
    }

    /// Creates a guard from configuration, with a default classifier.
    ///
    /// Hosts that have a connectivity signal should build the executor
    /// themselves via [`ErrorClassifier::with_probe`] and use `new`.
    pub fn from_config(config: &GuardConfig) -> Self {
        let executor = RetryExecutor::with_delays(
            ErrorClassifier::new(),
            Duration::from_millis(config.retry_base_delay_ms),
            Duration::from_millis(config.retry_max_delay_ms),
        );
        Self::new(
            config.cache_capacity,
            Duration::from_secs(config.default_ttl),
            executor,
            config.retry_max_attempts,
        )
    }

    // == Register Limit ==
    /// Registers a rate limit for an action class.
    ///
    /// Each action class gets its own independent quota/window pair.
    /// Calls for unregistered actions bypass rate limiting entirely.
    pub async fn register_limit(&self, action: &str, quota: u32, window: Duration) {
        self.limiters
            .write()
            .await
            .insert(action.to_string(), RateLimiter::new(quota, window));
    }

    // == Run ==
    /// Runs a guarded call.
    ///
    /// 1. Counts the call against the identity's quota for the action
    ///    class; denial returns a RateLimitExceeded error without touching
    ///    the cache or the operation.
    /// 2. Returns the cached value for the fingerprint if one is live.
    /// 3. Otherwise executes the operation under the retry policy and, on
    ///    success, stores the result under the fingerprint.
    pub async fn run<F, Fut>(
        &self,
        action: &str,
        identity: &str,
        fingerprint: &str,
        ttl: Option<Duration>,
        operation: F,
    ) -> Result<V>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<V, RawFailure>>,
    {
        if let Some(denial) = self.check_limit(action, identity).await {
            return Err(denial);
        }

        let key = fingerprint.to_string();
        if let Some(value) = self.cache.write().await.get(&key) {
            debug!(action, fingerprint, "cache hit, remote call skipped");
            return Ok(value);
        }

        let value = self.executor.execute(operation, self.max_attempts).await?;

        self.cache.write().await.set(key, value.clone(), ttl);
        Ok(value)
    }

    // == Check Limit ==
    /// Counts one call against the action's limiter, returning the denial
    /// error if the identity is out of quota.
    async fn check_limit(&self, action: &str, identity: &str) -> Option<ClassifiedError> {
        let mut limiters = self.limiters.write().await;
        let limiter = limiters.get_mut(action)?;

        if limiter.is_allowed(identity) {
            return None;
        }

        let wait = limiter.time_until_reset(identity);
        warn!(action, identity, wait_secs = wait.as_secs(), "guarded call denied by rate limit");
        Some(ClassifiedError::new(
            ErrorKind::RateLimitExceeded,
            format!(
                "Rate limit for '{}' reached, retry in {}s",
                action,
                wait.as_secs().max(1)
            ),
        ))
    }

    // == Remaining ==
    /// Requests the identity has left for an action class; None when the
    /// action has no registered limit.
    pub async fn remaining(&self, action: &str, identity: &str) -> Option<u32> {
        self.limiters
            .read()
            .await
            .get(action)
            .map(|limiter| limiter.remaining(identity))
    }

    // == Invalidate Matching ==
    /// Removes every cached result whose fingerprint satisfies the
    /// predicate; used for cascading invalidation when inputs change.
    pub async fn invalidate_matching<F>(&self, predicate: F) -> usize
    where
        F: Fn(&String) -> bool,
    {
        self.cache.write().await.invalidate_matching(predicate)
    }

    // == Cache Stats ==
    /// Snapshot of the underlying cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    // == Handles ==
    /// Shared handle to the cache, for the host's sweep schedule.
    pub fn cache_handle(&self) -> Arc<RwLock<BoundedCache<String, V>>> {
        self.cache.clone()
    }

    /// Shared handle to the limiter map, for the host's sweep schedule.
    pub fn limiter_handle(&self) -> Arc<RwLock<HashMap<String, RateLimiter>>> {
        self.limiters.clone()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_guard() -> Guard<String> {
        let executor = RetryExecutor::with_delays(
            ErrorClassifier::new(),
            Duration::from_millis(5),
            Duration::from_millis(20),
        );
        Guard::new(10, Duration::from_secs(300), executor, 3)
    }

    fn counted_op(
        calls: &Arc<AtomicU32>,
        result: &str,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = std::result::Result<String, RawFailure>> + Send>>
    {
        let calls = calls.clone();
        let result = result.to_string();
        move || {
            let calls = calls.clone();
            let result = result.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(result)
            })
        }
    }

    #[tokio::test]
    async fn test_run_fills_and_serves_from_cache() {
        let guard = fast_guard();
        let calls = Arc::new(AtomicU32::new(0));

        let first = guard
            .run("analysis", "user-1", "subject-7|analysis", None, counted_op(&calls, "score: 0.82"))
            .await
            .unwrap();
        let second = guard
            .run("analysis", "user-1", "subject-7|analysis", None, counted_op(&calls, "score: 0.82"))
            .await
            .unwrap();

        assert_eq!(first, "score: 0.82");
        assert_eq!(second, "score: 0.82");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "second call served from cache");

        let stats = guard.cache_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 1);
    }

    #[tokio::test]
    async fn test_run_denied_by_rate_limit() {
        let guard = fast_guard();
        guard.register_limit("search", 1, Duration::from_secs(60)).await;

        let calls = Arc::new(AtomicU32::new(0));

        guard
            .run("search", "user-1", "query-a", None, counted_op(&calls, "results"))
            .await
            .unwrap();

        // Second call uses a different fingerprint, so only the limiter can stop it
        let denied = guard
            .run("search", "user-1", "query-b", None, counted_op(&calls, "results"))
            .await
            .unwrap_err();

        assert_eq!(denied.kind, ErrorKind::RateLimitExceeded);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "denied call never reached the operation");
    }

    #[tokio::test]
    async fn test_run_unregistered_action_bypasses_limiting() {
        let guard = fast_guard();
        let calls = Arc::new(AtomicU32::new(0));

        for i in 0..20 {
            guard
                .run("export", "user-1", &format!("export-{}", i), None, counted_op(&calls, "csv"))
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_run_failure_does_not_fill_cache() {
        let guard = fast_guard();
        let calls = Arc::new(AtomicU32::new(0));

        let op_calls = calls.clone();
        let err = guard
            .run("analysis", "user-1", "subject-9|analysis", None, move || {
                let calls = op_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>(RawFailure::from_status(401))
                }
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(guard.cache_stats().await.size, 0);

        // A later call misses the cache and runs the operation again
        let second = guard
            .run("analysis", "user-1", "subject-9|analysis", None, counted_op(&calls, "late"))
            .await
            .unwrap();
        assert_eq!(second, "late");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_limits_are_per_identity_and_per_action() {
        let guard = fast_guard();
        guard.register_limit("search", 1, Duration::from_secs(60)).await;
        guard.register_limit("analysis", 1, Duration::from_secs(60)).await;

        let calls = Arc::new(AtomicU32::new(0));

        guard
            .run("search", "user-1", "s1", None, counted_op(&calls, "r"))
            .await
            .unwrap();

        // Different identity, same action: allowed
        guard
            .run("search", "user-2", "s2", None, counted_op(&calls, "r"))
            .await
            .unwrap();

        // Same identity, different action class: allowed
        guard
            .run("analysis", "user-1", "a1", None, counted_op(&calls, "r"))
            .await
            .unwrap();

        assert_eq!(guard.remaining("search", "user-1").await, Some(0));
        assert_eq!(guard.remaining("analysis", "user-2").await, Some(1));
        assert_eq!(guard.remaining("unregistered", "user-1").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_matching_forces_reexecution() {
        let guard = fast_guard();
        let calls = Arc::new(AtomicU32::new(0));

        guard
            .run("analysis", "user-1", "subject-7|analysis", None, counted_op(&calls, "v1"))
            .await
            .unwrap();

        let removed = guard
            .invalidate_matching(|key| key.starts_with("subject-7|"))
            .await;
        assert_eq!(removed, 1);

        guard
            .run("analysis", "user-1", "subject-7|analysis", None, counted_op(&calls, "v2"))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = GuardConfig::default();
        let guard: Guard<String> = Guard::from_config(&config);
        guard
            .register_limit("search", config.rate_quota, Duration::from_secs(config.rate_window))
            .await;

        let stats = guard.cache_stats().await;
        assert_eq!(stats.capacity, 200);
        assert_eq!(guard.remaining("search", "user-1").await, Some(30));
    }
}

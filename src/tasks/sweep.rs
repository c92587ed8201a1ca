//! Periodic Sweep Task
//!
//! Background task that bounds memory by removing expired cache entries and
//! stale rate-limit windows at a fixed interval. The components expose only
//! synchronous `sweep` operations; this task is the host-owned schedule that
//! drives them, with cancellation tied to the host's shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::BoundedCache;
use crate::limiter::RateLimiter;

/// Spawns a background task that periodically sweeps the cache and the
/// rate limiters.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It takes the write locks only for the duration of each
/// sweep.
///
/// # Arguments
/// * `cache` - Shared handle to the cache to sweep
/// * `limiters` - Shared handle to the per-action limiter map
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which the host aborts during
/// graceful shutdown.
pub fn spawn_sweep_task<V>(
    cache: Arc<RwLock<BoundedCache<String, V>>>,
    limiters: Arc<RwLock<HashMap<String, RateLimiter>>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let expired = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            let stale_windows = {
                let mut limiter_guard = limiters.write().await;
                limiter_guard
                    .values_mut()
                    .map(|limiter| limiter.sweep())
                    .sum::<usize>()
            };

            if expired > 0 || stale_windows > 0 {
                info!(
                    "Sweep removed {} expired entries and {} stale windows",
                    expired, stale_windows
                );
            } else {
                debug!("Sweep found nothing to remove");
            }
        }
    })
}

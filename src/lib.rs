//! Callguard - resource protection for expensive remote calls
//!
//! Guards quota-limited, sometimes-flaky remote analysis and search APIs
//! behind a bounded TTL+LRU cache, per-identity fixed-window rate limiting,
//! and classified retry with capped exponential backoff.

pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod limiter;
pub mod retry;
pub mod tasks;

pub use cache::{BoundedCache, CacheStats};
pub use config::GuardConfig;
pub use error::{ClassifiedError, ErrorKind, RawFailure, Result};
pub use guard::Guard;
pub use limiter::RateLimiter;
pub use retry::{ErrorClassifier, RetryExecutor};
pub use tasks::spawn_sweep_task;

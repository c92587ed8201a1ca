//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support and
//! per-entry access bookkeeping used by the eviction policy.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with its lifetime and access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Number of successful reads since creation
    pub access_count: u64,
    /// Timestamp of the most recent read, creation time until first read
    pub last_access_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after now.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            created_at: now,
            expires_at: now + ttl.as_millis() as u64,
            access_count: 0,
            last_access_at: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the entry is live while `now <= expires_at` and
    /// logically absent once the TTL has strictly elapsed. Readers must treat
    /// an expired entry as a miss even if no sweep has removed it yet.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.expires_at
    }

    // == Touch ==
    /// Records a successful read: bumps the access count and refreshes the
    /// last-access timestamp the eviction policy orders by.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_access_at = current_timestamp_ms();
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds.
    ///
    /// Returns 0 once the entry has expired. Useful for diagnostics.
    #[allow(dead_code)]
    pub fn ttl_remaining_ms(&self) -> u64 {
        let now = current_timestamp_ms();
        self.expires_at.saturating_sub(now)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("analysis result".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "analysis result");
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.last_access_at, entry.created_at);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(42u32, Duration::from_millis(50));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_touch_updates_metadata() {
        let mut entry = CacheEntry::new(1u8, Duration::from_secs(10));
        let created = entry.last_access_at;

        sleep(Duration::from_millis(5));
        entry.touch();
        entry.touch();

        assert_eq!(entry.access_count, 2);
        assert!(entry.last_access_at >= created);
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new((), Duration::from_secs(10));

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new((), Duration::from_millis(20));

        sleep(Duration::from_millis(50));

        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "boundary",
            created_at: now,
            expires_at: now + 60_000,
            access_count: 0,
            last_access_at: now,
        };

        // Still within its TTL, so it must read as live
        assert!(!entry.is_expired());
    }
}

//! Short-lived verdict cache
//!
//! Ownership checks against the same structure arrive in bursts (border
//! enforcement, door permissions, UI refreshes), so settled verdicts are
//! held for a short TTL instead of rescanning the region every time.
//! Entries expire lazily on read, and each insert purges whatever has gone
//! stale so the map stays bounded.

use std::time::{Duration, Instant};

use ahash::AHashMap;

use crate::core::types::RegionBox;

#[derive(Debug, Clone, Copy)]
struct CachedVerdict {
    conquered: bool,
    expires_at: Instant,
}

/// TTL cache of scan verdicts keyed by scanned region
#[derive(Debug)]
pub struct VerdictCache {
    ttl: Duration,
    entries: AHashMap<RegionBox, CachedVerdict>,
}

impl VerdictCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: AHashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached verdict for the region, if one is still fresh
    pub fn get(&mut self, region: RegionBox) -> Option<bool> {
        self.get_at(region, Instant::now())
    }

    /// Record a settled verdict for the region
    pub fn insert(&mut self, region: RegionBox, conquered: bool) {
        self.insert_at(region, conquered, Instant::now());
    }

    /// Number of entries held, stale ones included until they are touched
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn get_at(&mut self, region: RegionBox, now: Instant) -> Option<bool> {
        let entry = self.entries.get(&region).copied()?;
        if entry.expires_at > now {
            return Some(entry.conquered);
        }
        self.entries.remove(&region);
        None
    }

    fn insert_at(&mut self, region: RegionBox, conquered: bool, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            region,
            CachedVerdict {
                conquered,
                expires_at: now + self.ttl,
            },
        );
    }
}

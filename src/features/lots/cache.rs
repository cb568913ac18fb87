use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

/// Occupancy counts for one lot.
#[derive(Debug, Clone, Copy)]
pub struct LotAvailability {
    pub available_spots: i64,
    pub occupied_spots: i64,
}

struct CacheEntry {
    availability: LotAvailability,
    stored_at: Instant,
}

/// Best-effort side cache of per-lot occupancy counts.
///
/// Entries expire after a short TTL and the cache is never a correctness
/// dependency: every miss falls through to the entity store, and the
/// allocator mutates spot status without going through here.
pub struct LotStatusCache {
    entries: RwLock<HashMap<Uuid, CacheEntry>>,
    ttl: Duration,
}

impl LotStatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, lot_id: Uuid) -> Option<LotAvailability> {
        let entries = self.entries.read().await;
        entries
            .get(&lot_id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.availability)
    }

    pub async fn store(&self, lot_id: Uuid, availability: LotAvailability) {
        let mut entries = self.entries.write().await;
        entries.insert(
            lot_id,
            CacheEntry {
                availability,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, lot_id: Uuid) {
        let mut entries = self.entries.write().await;
        entries.remove(&lot_id);
    }
}

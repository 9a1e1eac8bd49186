//! Write serialization for the store.
//!
//! Engine mutations for one badge must not interleave: two near-simultaneous
//! scans of the same badge get two ledger rows, but the session status must
//! settle on the later event, never on a stale overwrite. Mutations for
//! different badges are independent and run in parallel.
//!
//! Bulk operations (import, delete-all, clear-history) instead need the
//! whole store to themselves. Engine ops therefore hold the gate shared
//! while bulk ops hold it exclusive.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct StoreGate {
    bulk: RwLock<()>,
    badges: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl StoreGate {
    pub fn new() -> Self {
        Self {
            bulk: RwLock::new(()),
            badges: StdMutex::new(HashMap::new()),
        }
    }

    /// Shared access for per-badge mutations; held for the duration of one
    /// engine operation.
    pub async fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.bulk.read().await
    }

    /// Exclusive access for bulk operations. Blocks until in-flight engine
    /// operations drain; these ops are rare and operator-initiated.
    pub async fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.bulk.write().await
    }

    /// Per-badge critical section. Locks on badges that turn out to be
    /// unknown are harmless; the registry is bounded by the roster size
    /// plus whatever garbage gets scanned at the kiosk.
    pub async fn badge(&self, employee_id: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.badges.lock().unwrap();
            map.entry(employee_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}

impl Default for StoreGate {
    fn default() -> Self {
        Self::new()
    }
}

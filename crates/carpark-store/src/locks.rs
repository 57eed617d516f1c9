//! Per-plate mutual exclusion
//!
//! Two sightings of the same plate must not interleave between reading the
//! stored session and writing the new one. Different plates never contend.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Registry of async locks keyed by plate
#[derive(Debug, Clone, Default)]
pub struct PlateLocks {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl PlateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other task holds `plate`, then hold it until the guard drops
    pub async fn lock(&self, plate: &str) -> PlateGuard {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(plate.to_string()).or_default().clone()
        };
        // Built before waiting so a cancelled wait still runs the cleanup in Drop
        let mut pending = PlateGuard {
            plate: plate.to_string(),
            slot: slot.clone(),
            guard: None,
            slots: self.slots.clone(),
        };
        pending.guard = Some(slot.lock_owned().await);
        pending
    }

    /// Number of plates currently locked or waited on
    pub fn active(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Held lock for one plate; releases and cleans up on drop
#[derive(Debug)]
pub struct PlateGuard {
    plate: String,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl PlateGuard {
    pub fn plate(&self) -> &str {
        &self.plate
    }
}

impl Drop for PlateGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut slots = self.slots.lock();
        // Only the map and this guard still reference the slot: nobody is waiting.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.plate);
        }
    }
}

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use pod_core::model::ProgressKey;

/// Caller-side reentrancy guard for lesson toggles.
///
/// Only one toggle per progress key may be in flight through the same guard;
/// a second attempt is turned away instead of racing the first. The store
/// itself is not locked.
#[derive(Debug, Clone, Default)]
pub struct ToggleGuard {
    in_flight: Arc<Mutex<HashSet<ProgressKey>>>,
}

impl ToggleGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if a toggle for it is already running.
    #[must_use]
    pub fn try_acquire(&self, key: ProgressKey) -> Option<TogglePermit> {
        let mut set = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(key.clone()) {
            return None;
        }
        Some(TogglePermit {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &ProgressKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct TogglePermit {
    in_flight: Arc<Mutex<HashSet<ProgressKey>>>,
    key: ProgressKey,
}

impl TogglePermit {
    #[must_use]
    pub fn key(&self) -> &ProgressKey {
        &self.key
    }
}

impl Drop for TogglePermit {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

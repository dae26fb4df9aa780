//! Admission guard - at most one reset at a time

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Single-slot gate shared by every request handler.
///
/// Cloning the guard shares the slot.
#[derive(Debug, Clone, Default)]
pub struct AdmissionGuard {
    held: Arc<AtomicBool>,
}

impl AdmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot if it is free. Never waits.
    ///
    /// The slot stays held until the returned permit is dropped or released.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                debug!("Admission slot acquired");
                AdmissionPermit {
                    held: self.held.clone(),
                }
            })
    }

    /// Whether a session currently holds the slot
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of holding the admission slot. Frees the slot when dropped.
#[derive(Debug)]
#[must_use = "the admission slot is released as soon as the permit is dropped"]
pub struct AdmissionPermit {
    held: Arc<AtomicBool>,
}

impl AdmissionPermit {
    /// Free the slot now
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        debug!("Admission slot released");
    }
}

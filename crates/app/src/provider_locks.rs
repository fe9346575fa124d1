//! Per-provider critical sections for check-then-insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use slotbook_domain::id::ProviderId;

/// Registry of one async mutex per provider.
///
/// Holding a [`ProviderGuard`] serializes every other booking attempt for the
/// same provider; different providers never wait on each other. Entries are
/// dropped once the last guard or waiter for them goes away, whether it
/// acquired the lock or was cancelled while waiting.
#[derive(Debug, Default)]
pub struct ProviderLocks {
    slots: Mutex<HashMap<ProviderId, Arc<AsyncMutex<()>>>>,
}

impl ProviderLocks {
    /// Wait for exclusive access to `provider_id`'s schedule.
    ///
    /// Cancelling the returned future while it waits still releases the
    /// provider's entry.
    pub async fn lock(&self, provider_id: &ProviderId) -> ProviderGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(provider_id.clone()).or_default())
        };
        // armed before awaiting so a dropped waiter still prunes the entry;
        // `acquire` is declared after it and therefore dropped first
        let mut guard = ProviderGuard {
            locks: self,
            provider_id: provider_id.clone(),
            guard: None,
        };
        let acquire = slot.lock_owned();
        guard.guard = Some(acquire.await);
        guard
    }

    #[cfg(test)]
    fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, provider_id: &ProviderId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots
            .get(provider_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(provider_id);
        }
    }
}

/// Exclusive access to one provider's schedule, released on drop.
///
/// While [`ProviderLocks::lock`] is still waiting the inner guard is `None`;
/// dropping it then only prunes the registry.
#[derive(Debug)]
pub struct ProviderGuard<'a> {
    locks: &'a ProviderLocks,
    provider_id: ProviderId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProviderGuard<'_> {
    fn drop(&mut self) {
        // the owned guard holds a reference to the slot; let it go first
        self.guard.take();
        self.locks.release(&self.provider_id);
    }
}

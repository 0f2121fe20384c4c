//! Capacity decisions and per-provider mutual exclusion

use crate::models::UserId;
use crate::storage::{RelationshipStore, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

type LockTable = HashMap<UserId, Arc<tokio::sync::Mutex<()>>>;

/// Hands out one async lock per provider.
///
/// Holding a [`ProviderLock`] serializes every relationship mutation of that
/// provider in this process. Entries nobody holds or waits on are pruned on
/// the next call to [`CapacityGuard::lock`].
#[derive(Debug, Default)]
pub struct CapacityGuard {
    locks: Mutex<LockTable>,
}

/// Proof that the caller holds a provider's lock. Released on drop.
#[derive(Debug)]
pub struct ProviderLock {
    provider_id: UserId,
    _guard: OwnedMutexGuard<()>,
}

impl ProviderLock {
    pub fn provider_id(&self) -> &UserId {
        &self.provider_id
    }
}

impl CapacityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `provider_id`
    pub async fn lock(&self, provider_id: &UserId) -> ProviderLock {
        let mutex = {
            let mut table = self.table();
            // Only the table holds idle entries
            table.retain(|id, entry| id == provider_id || Arc::strong_count(entry) > 1);
            Arc::clone(table.entry(provider_id.clone()).or_default())
        };

        let guard = mutex.lock_owned().await;
        tracing::trace!(provider_id = %provider_id, "Provider lock acquired");

        ProviderLock {
            provider_id: provider_id.clone(),
            _guard: guard,
        }
    }

    /// Number of providers with a live lock entry
    pub fn tracked_providers(&self) -> usize {
        self.table().len()
    }

    /// Whether a provider holding `accepted` relationships can take one more
    pub fn has_room(accepted: usize, limit: u32) -> bool {
        (accepted as u64) < u64::from(limit)
    }

    /// Decide from the store whether the locked provider can accept one more
    /// relationship under `limit`
    pub async fn can_accept<S>(
        store: &S,
        lock: &ProviderLock,
        limit: u32,
    ) -> Result<bool, StorageError>
    where
        S: RelationshipStore + ?Sized,
    {
        let accepted = store.count_accepted(lock.provider_id()).await?;
        let room = Self::has_room(accepted, limit);
        tracing::debug!(
            provider_id = %lock.provider_id(),
            accepted,
            limit,
            room,
            "Capacity checked"
        );
        Ok(room)
    }

    fn table(&self) -> MutexGuard<'_, LockTable> {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

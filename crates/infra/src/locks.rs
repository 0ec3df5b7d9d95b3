//! Per-user mutual exclusion for read-modify-write sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use quartermaster_core::UserId;

/// Hands out one async mutex per user id.
///
/// Different users never contend. Idle entries are pruned when the registry is touched,
/// so it grows with concurrently active users rather than with every user ever seen.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user`'s inventory. Released when the guard drops.
    pub async fn lock(&self, user: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.retain(|id, lock| id == user || Arc::strong_count(lock) > 1);
            locks.entry(user.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

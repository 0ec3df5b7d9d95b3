use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use quartermaster_core::{ActorReference, UserId};
use quartermaster_inventory::{Inventory, InventoryEntry};

use super::r#trait::{ActorDirectory, InventoryStore, StoreError, UserProfile};

/// In-memory inventory store for tests/dev.
///
/// `replace` holds a single write lock for the delete and the insert, so renames are
/// atomic here.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inventories: RwLock<HashMap<UserId, Inventory>>,
    /// Profiles with their registration sequence number (listing order).
    profiles: RwLock<HashMap<UserId, (u64, UserProfile)>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn get_all(&self, user: &UserId) -> Result<Inventory, StoreError> {
        let map = self.inventories.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(user).cloned().unwrap_or_default())
    }

    async fn get_one(
        &self,
        user: &UserId,
        key: &str,
    ) -> Result<Option<InventoryEntry>, StoreError> {
        let map = self.inventories.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(user).and_then(|inv| inv.get(key)).cloned())
    }

    async fn set(
        &self,
        user: &UserId,
        key: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        let mut map = self.inventories.write().map_err(|_| StoreError::Poisoned)?;
        map.entry(user.clone())
            .or_default()
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn update_quantity(
        &self,
        user: &UserId,
        key: &str,
        quantity: u64,
    ) -> Result<(), StoreError> {
        let mut map = self.inventories.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(entry) = map.get_mut(user).and_then(|inv| inv.get_mut(key)) {
            entry.quantity = quantity;
        }
        Ok(())
    }

    async fn delete(&self, user: &UserId, key: &str) -> Result<(), StoreError> {
        let mut map = self.inventories.write().map_err(|_| StoreError::Poisoned)?;
        if let Some(inv) = map.get_mut(user) {
            inv.remove(key);
        }
        Ok(())
    }

    async fn replace(
        &self,
        user: &UserId,
        from: &str,
        to: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        let mut map = self.inventories.write().map_err(|_| StoreError::Poisoned)?;
        let inv = map.entry(user.clone()).or_default();
        inv.remove(from);
        inv.insert(to.to_string(), entry.clone());
        Ok(())
    }
}

#[async_trait]
impl ActorDirectory for InMemoryInventoryStore {
    async fn register(&self, user: &UserId, display_name: &str) -> Result<UserProfile, StoreError> {
        let mut map = self.profiles.write().map_err(|_| StoreError::Poisoned)?;
        let seq = map.len() as u64;
        let (_, profile) = map.entry(user.clone()).or_insert_with(|| {
            (
                seq,
                UserProfile {
                    user_id: user.clone(),
                    display_name: display_name.to_string(),
                    registered_at: Utc::now(),
                },
            )
        });
        profile.display_name = display_name.to_string();
        Ok(profile.clone())
    }

    async fn profile(&self, user: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let map = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(user).map(|(_, p)| p.clone()))
    }

    async fn list_all(&self) -> Result<Vec<ActorReference>, StoreError> {
        let map = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        let mut profiles: Vec<&(u64, UserProfile)> = map.values().collect();
        profiles.sort_by_key(|(seq, _)| *seq);
        Ok(profiles.into_iter().map(|(_, p)| p.actor_reference()).collect())
    }
}

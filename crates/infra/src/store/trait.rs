use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quartermaster_core::{ActorReference, UserId};
use quartermaster_inventory::{Inventory, InventoryEntry, StoreOp};

/// Store errors (infrastructure-level).
///
/// These never describe inventory outcomes like a missing item; those are decided by the
/// domain from a successful read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("store backend failure: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// An in-process lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// A registered chat user (created by `.initme`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub registered_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn actor_reference(&self) -> ActorReference {
        ActorReference::new(self.display_name.clone(), self.user_id.clone())
    }
}

/// Per-user keyed item storage.
///
/// Keys are compared exactly here; case-insensitive resolution is the domain's job.
/// Writing a quantity of 0 is never requested by the domain (a zero entry is deleted).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn get_all(&self, user: &UserId) -> Result<Inventory, StoreError>;

    /// Exact-case lookup of a single key.
    async fn get_one(&self, user: &UserId, key: &str) -> Result<Option<InventoryEntry>, StoreError>;

    async fn set(&self, user: &UserId, key: &str, entry: &InventoryEntry) -> Result<(), StoreError>;

    /// Set the quantity of an existing key, keeping its metadata. Missing keys are left alone.
    async fn update_quantity(
        &self,
        user: &UserId,
        key: &str,
        quantity: u64,
    ) -> Result<(), StoreError>;

    async fn delete(&self, user: &UserId, key: &str) -> Result<(), StoreError>;

    /// Move an entry from `from` to `to`.
    ///
    /// The default is delete followed by set, which is not atomic. Adapters that can run
    /// both in one transaction override it.
    async fn replace(
        &self,
        user: &UserId,
        from: &str,
        to: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        self.delete(user, from).await?;
        self.set(user, to, entry).await
    }
}

/// Registered users and their display names. Backed by the same store as inventories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Create the profile, or rename it if it exists. Inventory is untouched.
    async fn register(&self, user: &UserId, display_name: &str) -> Result<UserProfile, StoreError>;

    async fn profile(&self, user: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Every registered user in registration order.
    async fn list_all(&self) -> Result<Vec<ActorReference>, StoreError>;
}

/// Execute one planned [`StoreOp`] against a store.
pub async fn apply_op<S>(store: &S, user: &UserId, op: &StoreOp) -> Result<(), StoreError>
where
    S: InventoryStore + ?Sized,
{
    match op {
        StoreOp::Create { key, entry } => store.set(user, key, entry).await,
        StoreOp::UpdateQuantity { key, quantity } => {
            store.update_quantity(user, key, *quantity).await
        }
        StoreOp::Delete { key } => store.delete(user, key).await,
        StoreOp::Rename { from, to, entry } => store.replace(user, from, to, entry).await,
    }
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn get_all(&self, user: &UserId) -> Result<Inventory, StoreError> {
        (**self).get_all(user).await
    }

    async fn get_one(
        &self,
        user: &UserId,
        key: &str,
    ) -> Result<Option<InventoryEntry>, StoreError> {
        (**self).get_one(user, key).await
    }

    async fn set(
        &self,
        user: &UserId,
        key: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        (**self).set(user, key, entry).await
    }

    async fn update_quantity(
        &self,
        user: &UserId,
        key: &str,
        quantity: u64,
    ) -> Result<(), StoreError> {
        (**self).update_quantity(user, key, quantity).await
    }

    async fn delete(&self, user: &UserId, key: &str) -> Result<(), StoreError> {
        (**self).delete(user, key).await
    }

    async fn replace(
        &self,
        user: &UserId,
        from: &str,
        to: &str,
        entry: &InventoryEntry,
    ) -> Result<(), StoreError> {
        (**self).replace(user, from, to, entry).await
    }
}

#[async_trait]
impl<S> ActorDirectory for Arc<S>
where
    S: ActorDirectory + ?Sized,
{
    async fn register(&self, user: &UserId, display_name: &str) -> Result<UserProfile, StoreError> {
        (**self).register(user, display_name).await
    }

    async fn profile(&self, user: &UserId) -> Result<Option<UserProfile>, StoreError> {
        (**self).profile(user).await
    }

    async fn list_all(&self) -> Result<Vec<ActorReference>, StoreError> {
        (**self).list_all().await
    }
}

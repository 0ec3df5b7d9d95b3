//! Inventory persistence boundary.
//!
//! Ports ([`InventoryStore`], [`ActorDirectory`]) and their adapters. The domain decides
//! what to write; stores only execute it.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{ActorDirectory, InventoryStore, StoreError, UserProfile, apply_op};

#[cfg(test)]
pub use r#trait::{MockActorDirectory, MockInventoryStore};

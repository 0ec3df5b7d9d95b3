//! Inventory mutation pipeline (application-level orchestration).
//!
//! ```text
//! item name
//!   ↓
//! 1. Normalize and ask the oracle for both forms (outside the user lock)
//!   ↓
//! 2. Take the user's lock
//!   ↓
//! 3. Load the inventory
//!   ↓
//! 4. Plan the change (pure domain decision)
//!   ↓
//! 5. Apply the single planned store op
//! ```
//!
//! The lock covers steps 3 to 5, so concurrent mutations of one user cannot both read the
//! same old state. The oracle call does not depend on stored state and stays outside it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use quartermaster_core::{DomainError, UserId};
use quartermaster_inventory::{
    ItemForms, MutationOutcome, Quantity, normalize_phrase, plan_addition, plan_removal,
};

use crate::locks::UserLocks;
use crate::morphology::{MorphologyOracle, OracleError, validate_output};
use crate::store::{InventoryStore, StoreError, apply_op};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("item not found: {item}")]
    NotFound { item: String },

    #[error("insufficient quantity of {key}: held {held}, requested {requested}")]
    InsufficientQuantity {
        key: String,
        held: u64,
        requested: u64,
    },

    /// Deterministic rejection of the request itself (blank item name, a total above the
    /// quantity cap).
    #[error("invalid request: {0}")]
    Validation(String),

    /// A planned mutation would break an inventory invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MutationError {
    /// Failures of the system rather than outcomes of the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            MutationError::Oracle(_)
                | MutationError::Store(_)
                | MutationError::InvariantViolation(_)
        )
    }
}

impl From<DomainError> for MutationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound { item } => MutationError::NotFound { item },
            DomainError::InsufficientQuantity {
                key,
                held,
                requested,
            } => MutationError::InsufficientQuantity {
                key,
                held,
                requested,
            },
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                MutationError::Validation(msg)
            }
            DomainError::InvariantViolation(msg) => MutationError::InvariantViolation(msg),
        }
    }
}

/// Applies additions and removals for any user against an injected store and oracle.
#[derive(Debug)]
pub struct InventoryMutator<S, O> {
    store: S,
    oracle: O,
    locks: Arc<UserLocks>,
}

impl<S, O> InventoryMutator<S, O> {
    pub fn new(store: S, oracle: O) -> Self {
        Self::with_locks(store, oracle, Arc::new(UserLocks::new()))
    }

    /// Share a lock registry with other writers of the same store.
    pub fn with_locks(store: S, oracle: O, locks: Arc<UserLocks>) -> Self {
        Self {
            store,
            oracle,
            locks,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, O> InventoryMutator<S, O>
where
    S: InventoryStore,
    O: MorphologyOracle,
{
    /// Add `delta` of `item_name` to `user`'s inventory.
    ///
    /// Returns the key the item is stored under afterwards and its new quantity.
    #[instrument(skip(self), fields(user_id = %user, delta = delta.get()))]
    pub async fn apply_addition(
        &self,
        user: &UserId,
        item_name: &str,
        delta: Quantity,
    ) -> Result<MutationOutcome, MutationError> {
        let forms = self.item_forms(item_name).await?;

        let _guard = self.locks.lock(user).await;
        let inventory = self.store.get_all(user).await.inspect_err(log_store_failure)?;
        let plan = plan_addition(&inventory, &forms, delta)?;
        apply_op(&self.store, user, &plan.op)
            .await
            .inspect_err(log_store_failure)?;

        info!(
            key = %plan.outcome.key,
            quantity = plan.outcome.quantity,
            change = ?plan.outcome.change,
            "item added"
        );
        Ok(plan.outcome)
    }

    /// Remove `delta` of `item_name` from `user`'s inventory.
    ///
    /// Fails with `NotFound` when the concept is not held and with `InsufficientQuantity`
    /// (inventory unchanged) when fewer than `delta` are held. When the quantity reaches 0
    /// the outcome names the deleted key.
    #[instrument(skip(self), fields(user_id = %user, delta = delta.get()))]
    pub async fn apply_removal(
        &self,
        user: &UserId,
        item_name: &str,
        delta: Quantity,
    ) -> Result<MutationOutcome, MutationError> {
        let forms = self.item_forms(item_name).await?;

        let _guard = self.locks.lock(user).await;
        let inventory = self.store.get_all(user).await.inspect_err(log_store_failure)?;
        let plan = plan_removal(&inventory, &forms, item_name, delta)?;
        apply_op(&self.store, user, &plan.op)
            .await
            .inspect_err(log_store_failure)?;

        info!(
            key = %plan.outcome.key,
            quantity = plan.outcome.quantity,
            change = ?plan.outcome.change,
            "item removed"
        );
        Ok(plan.outcome)
    }

    /// Ask the oracle for both forms of the normalized item name, concurrently.
    async fn item_forms(&self, item_name: &str) -> Result<ItemForms, MutationError> {
        let phrase = normalize_phrase(item_name);
        if phrase.is_empty() {
            return Err(MutationError::Validation("item name is blank".to_string()));
        }

        let (plural, singular) =
            tokio::try_join!(self.oracle.pluralize(&phrase), self.oracle.singularize(&phrase))
                .inspect_err(|e| warn!(phrase = %phrase, error = %e, "morphology oracle failed"))?;

        let plural = normalize_phrase(&validate_output(&phrase, &plural)?);
        let singular = normalize_phrase(&validate_output(&phrase, &singular)?);
        Ok(ItemForms::new(singular, plural)?)
    }
}

fn log_store_failure(err: &StoreError) {
    warn!(error = %err, "inventory store failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{MockMorphologyOracle, RuleBasedOracle};
    use crate::store::{InMemoryInventoryStore, MockInventoryStore};
    use quartermaster_inventory::{Change, Inventory, InventoryEntry, MAX_QUANTITY};

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn q(n: u64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn mutator() -> InventoryMutator<InMemoryInventoryStore, RuleBasedOracle> {
        InventoryMutator::new(InMemoryInventoryStore::new(), RuleBasedOracle::new())
    }

    async fn keys(
        m: &InventoryMutator<InMemoryInventoryStore, RuleBasedOracle>,
    ) -> Vec<(String, u64)> {
        m.store()
            .get_all(&user())
            .await
            .unwrap()
            .into_iter()
            .map(|(k, e)| (k, e.quantity))
            .collect()
    }

    #[tokio::test]
    async fn first_addition_picks_the_number_of_the_quantity() {
        let m = mutator();
        let one = m.apply_addition(&user(), "Sword", q(1)).await.unwrap();
        let two = m.apply_addition(&user(), "Shield", q(2)).await.unwrap();

        assert_eq!((one.key.as_str(), one.quantity), ("sword", 1));
        assert_eq!((two.key.as_str(), two.quantity), ("shields", 2));
        assert_eq!(one.change, Change::Created);
    }

    #[tokio::test]
    async fn growing_past_one_renames_to_plural() {
        let m = mutator();
        m.apply_addition(&user(), "sword", q(1)).await.unwrap();
        let out = m.apply_addition(&user(), "Swords", q(2)).await.unwrap();

        assert_eq!(out.key, "swords");
        assert_eq!(out.change, Change::Renamed { from: "sword".into() });
        assert_eq!(keys(&m).await, vec![("swords".to_string(), 3)]);
    }

    #[tokio::test]
    async fn removal_walks_plural_to_singular_to_gone() {
        let m = mutator();
        m.apply_addition(&user(), "Potion Of Healing", q(3)).await.unwrap();

        let out = m.apply_removal(&user(), "potions of healing", q(2)).await.unwrap();
        assert_eq!((out.key.as_str(), out.quantity), ("potion of healing", 1));

        let out = m.apply_removal(&user(), "Potion of Healing", q(1)).await.unwrap();
        assert_eq!((out.key.as_str(), out.quantity), ("potion of healing", 0));
        assert_eq!(out.change, Change::Deleted);
        assert!(keys(&m).await.is_empty());
    }

    #[tokio::test]
    async fn insufficient_removal_leaves_inventory_unchanged() {
        let m = mutator();
        m.apply_addition(&user(), "Sword", q(2)).await.unwrap();

        let err = m.apply_removal(&user(), "Swords", q(5)).await.unwrap_err();
        assert_eq!(
            err,
            MutationError::InsufficientQuantity {
                key: "swords".into(),
                held: 2,
                requested: 5
            }
        );
        assert!(!err.is_internal());
        assert_eq!(keys(&m).await, vec![("swords".to_string(), 2)]);
    }

    #[tokio::test]
    async fn removing_an_unknown_item_is_not_found() {
        let m = mutator();
        let err = m.apply_removal(&user(), "  Dragon Egg ", q(1)).await.unwrap_err();
        assert_eq!(err, MutationError::NotFound { item: "Dragon Egg".into() });
    }

    #[tokio::test]
    async fn exceeding_the_quantity_cap_is_a_request_error() {
        let m = mutator();
        m.apply_addition(&user(), "Coin", q(MAX_QUANTITY)).await.unwrap();

        let err = m.apply_addition(&user(), "coins", q(1)).await.unwrap_err();
        assert!(matches!(err, MutationError::Validation(_)));
        assert!(!err.is_internal());
        assert_eq!(keys(&m).await, vec![("coins".to_string(), MAX_QUANTITY)]);
    }

    #[tokio::test]
    async fn blank_item_name_is_rejected_without_oracle_calls() {
        let mut oracle = MockMorphologyOracle::new();
        oracle.expect_pluralize().never();
        oracle.expect_singularize().never();
        let m = InventoryMutator::new(InMemoryInventoryStore::new(), oracle);

        let err = m.apply_addition(&user(), "   ", q(1)).await.unwrap_err();
        assert!(matches!(err, MutationError::Validation(_)));
    }

    #[tokio::test]
    async fn oracle_failure_is_reported_and_store_untouched() {
        let mut oracle = MockMorphologyOracle::new();
        oracle
            .expect_pluralize()
            .returning(|_| Err(OracleError::Timeout { after_ms: 5000 }));
        oracle
            .expect_singularize()
            .returning(|p| Ok(p.to_string()));

        let mut store = MockInventoryStore::new();
        store.expect_get_all().never();
        store.expect_set().never();

        let m = InventoryMutator::new(store, oracle);
        let err = m.apply_addition(&user(), "Sword", q(1)).await.unwrap_err();

        assert_eq!(err, MutationError::Oracle(OracleError::Timeout { after_ms: 5000 }));
        assert!(err.is_internal());
    }

    #[tokio::test]
    async fn degenerate_oracle_output_is_an_oracle_failure() {
        let mut oracle = MockMorphologyOracle::new();
        oracle.expect_pluralize().returning(|_| Ok("\n".to_string()));
        oracle.expect_singularize().returning(|p| Ok(p.to_string()));

        let m = InventoryMutator::new(InMemoryInventoryStore::new(), oracle);
        let err = m.apply_addition(&user(), "Sword", q(1)).await.unwrap_err();
        assert!(matches!(err, MutationError::Oracle(OracleError::Degenerate(_))));
    }

    #[tokio::test]
    async fn store_read_failure_aborts_before_any_write() {
        let mut store = MockInventoryStore::new();
        store
            .expect_get_all()
            .returning(|_| Err(StoreError::Backend("connection reset".into())));
        store.expect_set().never();
        store.expect_update_quantity().never();

        let m = InventoryMutator::new(store, RuleBasedOracle::new());
        let err = m.apply_addition(&user(), "Sword", q(1)).await.unwrap_err();
        assert_eq!(err, MutationError::Store(StoreError::Backend("connection reset".into())));
    }

    #[tokio::test]
    async fn rename_goes_through_replace_exactly_once() {
        let mut store = MockInventoryStore::new();
        store.expect_get_all().returning(|_| {
            let mut inv = Inventory::new();
            inv.insert("Sword".into(), InventoryEntry::new(1));
            Ok(inv)
        });
        store
            .expect_replace()
            .withf(|_, from, to, entry| from == "Sword" && to == "swords" && entry.quantity == 4)
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        store.expect_delete().never();
        store.expect_set().never();

        let m = InventoryMutator::new(store, RuleBasedOracle::new());
        let out = m.apply_addition(&user(), "sword", q(3)).await.unwrap();
        assert_eq!(out.change, Change::Renamed { from: "Sword".into() });
    }

    #[tokio::test]
    async fn concurrent_additions_for_one_user_are_not_lost() {
        let m = Arc::new(mutator());
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let m = m.clone();
                tokio::spawn(async move { m.apply_addition(&user(), "Arrow", q(1)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(keys(&m).await, vec![("arrows".to_string(), 20)]);
    }
}

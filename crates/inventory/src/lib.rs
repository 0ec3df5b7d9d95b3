//! Inventory domain module.
//!
//! This crate contains the business rules for number-aware inventories, implemented
//! purely as deterministic domain logic (no IO, no oracle calls, no storage). Callers
//! fetch the inventory and the item forms, ask this crate for a [`MutationPlan`], and
//! hand the plan's [`StoreOp`] to a store.

pub mod entry;
pub mod mutation;
pub mod resolver;

pub use entry::{
    GrammaticalNumber, Inventory, InventoryEntry, ItemForms, Quantity, fold_case, keys_match,
    normalize_phrase,
};
pub use mutation::{
    Change, MAX_QUANTITY, MutationOutcome, MutationPlan, StoreOp, plan_addition, plan_removal,
};
pub use resolver::{ResolvedEntry, resolve};

//! Inventory mutation rules (pure decision logic).
//!
//! `plan_addition` / `plan_removal` look at the current inventory and the oracle's item
//! forms and decide a single [`StoreOp`]. They never touch a store; applying the op is
//! the caller's job (see [`StoreOp::apply_to`] for the reference semantics).
//!
//! After every plan the concept is stored under exactly one key whose grammatical number
//! matches the stored quantity, or not at all when the quantity reached zero.

use serde::{Deserialize, Serialize};

use quartermaster_core::{DomainError, DomainResult};

use crate::entry::{Inventory, InventoryEntry, ItemForms, Quantity, keys_match};
use crate::resolver::{ResolvedEntry, resolve};

/// Largest quantity one entry may hold. Every store backend can represent it.
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

/// One store write. Renames are a single op so stores can run them atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreOp {
    Create { key: String, entry: InventoryEntry },
    UpdateQuantity { key: String, quantity: u64 },
    Delete { key: String },
    Rename {
        from: String,
        to: String,
        entry: InventoryEntry,
    },
}

impl StoreOp {
    /// Apply this op to an in-memory inventory.
    pub fn apply_to(&self, inventory: &mut Inventory) {
        match self {
            StoreOp::Create { key, entry } => {
                inventory.insert(key.clone(), entry.clone());
            }
            StoreOp::UpdateQuantity { key, quantity } => {
                if let Some(entry) = inventory.get_mut(key) {
                    entry.quantity = *quantity;
                }
            }
            StoreOp::Delete { key } => {
                inventory.remove(key);
            }
            StoreOp::Rename { from, to, entry } => {
                inventory.remove(from);
                inventory.insert(to.clone(), entry.clone());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Created,
    Updated,
    Renamed { from: String },
    Deleted,
}

/// What a mutation did, reported in terms of the final stored state.
///
/// `key` is the key the concept is stored under afterwards, or the key that was removed
/// when `quantity` is 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub key: String,
    pub quantity: u64,
    pub change: Change,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationPlan {
    pub op: StoreOp,
    pub outcome: MutationOutcome,
}

/// Decide how to add `delta` items of the concept described by `forms`.
///
/// A total above [`MAX_QUANTITY`] is a validation error of the request.
pub fn plan_addition(
    inventory: &Inventory,
    forms: &ItemForms,
    delta: Quantity,
) -> DomainResult<MutationPlan> {
    let too_many = || DomainError::validation(format!("quantity would exceed {MAX_QUANTITY}"));
    if delta.get() > MAX_QUANTITY {
        return Err(too_many());
    }

    let Some(existing) = resolve(inventory, forms) else {
        let key = forms.key_for(delta.get()).to_string();
        return Ok(MutationPlan {
            op: StoreOp::Create {
                key: key.clone(),
                entry: InventoryEntry::new(delta.get()),
            },
            outcome: MutationOutcome {
                key,
                quantity: delta.get(),
                change: Change::Created,
            },
        });
    };

    let new_quantity = existing
        .entry
        .quantity
        .checked_add(delta.get())
        .filter(|q| *q <= MAX_QUANTITY)
        .ok_or_else(too_many)?;

    Ok(renormalize(existing, forms, new_quantity))
}

/// Decide how to remove `delta` items of the concept described by `forms`.
///
/// `requested` is the caller's spelling of the item, used only to report `NotFound`.
pub fn plan_removal(
    inventory: &Inventory,
    forms: &ItemForms,
    requested: &str,
    delta: Quantity,
) -> DomainResult<MutationPlan> {
    let existing =
        resolve(inventory, forms).ok_or_else(|| DomainError::not_found(requested.trim()))?;

    let held = existing.entry.quantity;
    if held < delta.get() {
        return Err(DomainError::insufficient(existing.key, held, delta.get()));
    }

    let new_quantity = held - delta.get();
    if new_quantity == 0 {
        return Ok(MutationPlan {
            op: StoreOp::Delete {
                key: existing.key.clone(),
            },
            outcome: MutationOutcome {
                key: existing.key,
                quantity: 0,
                change: Change::Deleted,
            },
        });
    }

    Ok(renormalize(existing, forms, new_quantity))
}

/// Store `new_quantity` for an existing entry, moving it to the key whose number matches.
fn renormalize(existing: ResolvedEntry, forms: &ItemForms, new_quantity: u64) -> MutationPlan {
    let target = forms.key_for(new_quantity);

    if keys_match(&existing.key, target) {
        return MutationPlan {
            op: StoreOp::UpdateQuantity {
                key: existing.key.clone(),
                quantity: new_quantity,
            },
            outcome: MutationOutcome {
                key: existing.key,
                quantity: new_quantity,
                change: Change::Updated,
            },
        };
    }

    MutationPlan {
        op: StoreOp::Rename {
            from: existing.key.clone(),
            to: target.to_string(),
            entry: existing.entry.with_quantity(new_quantity),
        },
        outcome: MutationOutcome {
            key: target.to_string(),
            quantity: new_quantity,
            change: Change::Renamed { from: existing.key },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> ItemForms {
        ItemForms::new("sword", "swords").unwrap()
    }

    fn qty(n: u64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn apply(inventory: &mut Inventory, plan: &MutationPlan) {
        plan.op.apply_to(inventory);
    }

    #[test]
    fn adding_one_new_item_creates_singular_key() {
        let mut inv = Inventory::new();
        let plan = plan_addition(&inv, &sword(), qty(1)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(plan.outcome.change, Change::Created);
        assert_eq!(plan.outcome.key, "sword");
        assert_eq!(inv.get("sword").map(|e| e.quantity), Some(1));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn adding_two_new_items_creates_plural_key() {
        let mut inv = Inventory::new();
        let plan = plan_addition(&inv, &sword(), qty(2)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(plan.outcome.key, "swords");
        assert_eq!(inv.get("swords").map(|e| e.quantity), Some(2));
        assert!(!inv.contains_key("sword"));
    }

    #[test]
    fn adding_to_singular_renames_to_plural() {
        let mut inv = Inventory::new();
        inv.insert("Sword".to_string(), InventoryEntry::new(1));

        let plan = plan_addition(&inv, &sword(), qty(1)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(
            plan.outcome.change,
            Change::Renamed {
                from: "Sword".to_string()
            }
        );
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.get("swords").map(|e| e.quantity), Some(2));
    }

    #[test]
    fn adding_to_plural_updates_in_place_keeping_stored_case() {
        let mut inv = Inventory::new();
        inv.insert("Swords".to_string(), InventoryEntry::new(3));

        let plan = plan_addition(&inv, &sword(), qty(2)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(
            plan.op,
            StoreOp::UpdateQuantity {
                key: "Swords".to_string(),
                quantity: 5
            }
        );
        assert_eq!(inv.get("Swords").map(|e| e.quantity), Some(5));
    }

    #[test]
    fn removing_missing_item_is_not_found() {
        let inv = Inventory::new();
        let err = plan_removal(&inv, &sword(), " Swords ", qty(1)).unwrap_err();
        assert_eq!(err, DomainError::not_found("Swords"));
    }

    #[test]
    fn removing_too_many_reports_held_quantity() {
        let mut inv = Inventory::new();
        inv.insert("Sword".to_string(), InventoryEntry::new(2));
        let before = inv.clone();

        let err = plan_removal(&inv, &sword(), "Swords", qty(5)).unwrap_err();
        assert_eq!(err, DomainError::insufficient("Sword", 2, 5));
        assert_eq!(inv, before);
    }

    #[test]
    fn removing_everything_deletes_regardless_of_key_form() {
        for (key, held) in [("sword", 1), ("swords", 4)] {
            let mut inv = Inventory::new();
            inv.insert(key.to_string(), InventoryEntry::new(held));

            let plan = plan_removal(&inv, &sword(), "sword", qty(held)).unwrap();
            apply(&mut inv, &plan);

            assert_eq!(plan.outcome.change, Change::Deleted);
            assert_eq!(plan.outcome.key, key);
            assert_eq!(plan.outcome.quantity, 0);
            assert!(inv.is_empty());
        }
    }

    #[test]
    fn removing_down_to_one_renames_to_singular_and_keeps_metadata() {
        let mut inv = Inventory::new();
        let mut entry = InventoryEntry::new(3);
        entry
            .metadata
            .insert("rarity".to_string(), serde_json::json!("epic"));
        inv.insert("swords".to_string(), entry);

        let plan = plan_removal(&inv, &sword(), "swords", qty(2)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(plan.outcome.key, "sword");
        let stored = inv.get("sword").unwrap();
        assert_eq!(stored.quantity, 1);
        assert_eq!(stored.metadata.get("rarity"), Some(&serde_json::json!("epic")));
        assert!(!inv.contains_key("swords"));
    }

    #[test]
    fn removing_some_of_a_plural_updates_in_place() {
        let mut inv = Inventory::new();
        inv.insert("swords".to_string(), InventoryEntry::new(5));

        let plan = plan_removal(&inv, &sword(), "sword", qty(2)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(plan.outcome.change, Change::Updated);
        assert_eq!(inv.get("swords").map(|e| e.quantity), Some(3));
    }

    #[test]
    fn invariant_nouns_never_rename() {
        let gold = ItemForms::new("gold", "gold").unwrap();
        let mut inv = Inventory::new();

        let plan = plan_addition(&inv, &gold, qty(1)).unwrap();
        apply(&mut inv, &plan);
        let plan = plan_addition(&inv, &gold, qty(9)).unwrap();
        apply(&mut inv, &plan);

        assert_eq!(plan.outcome.change, Change::Updated);
        assert_eq!(inv.get("gold").map(|e| e.quantity), Some(10));
    }

    #[test]
    fn exceeding_the_quantity_cap_is_a_validation_error() {
        let mut inv = Inventory::new();
        inv.insert("swords".to_string(), InventoryEntry::new(MAX_QUANTITY));

        let err = plan_addition(&inv, &sword(), qty(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = plan_addition(&Inventory::new(), &sword(), qty(u64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn store_op_serializes_with_tag() {
        let op = StoreOp::Delete {
            key: "sword".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            serde_json::json!({"op": "delete", "key": "sword"})
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Step {
            Add(usize, u64),
            Remove(usize, u64),
        }

        fn concepts() -> Vec<ItemForms> {
            vec![
                ItemForms::new("sword", "swords").unwrap(),
                ItemForms::new("potion of healing", "potions of healing").unwrap(),
                ItemForms::new("gold", "gold").unwrap(),
            ]
        }

        fn step() -> impl Strategy<Value = Step> {
            prop_oneof![
                (0usize..3, 1u64..6).prop_map(|(c, n)| Step::Add(c, n)),
                (0usize..3, 1u64..6).prop_map(|(c, n)| Step::Remove(c, n)),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: each concept is stored under at most one key, with the number
            /// matching its quantity, and the quantity matches a simple counter model.
            #[test]
            fn one_key_per_concept(steps in prop::collection::vec(step(), 0..40)) {
                let concepts = concepts();
                let mut inv = Inventory::new();
                let mut model = [0u64; 3];

                for s in steps {
                    match s {
                        Step::Add(c, n) => {
                            let plan =
                                plan_addition(&inv, &concepts[c], Quantity::new(n).unwrap())
                                    .unwrap();
                            plan.op.apply_to(&mut inv);
                            model[c] += n;
                        }
                        Step::Remove(c, n) => {
                            match plan_removal(&inv, &concepts[c], "x", Quantity::new(n).unwrap()) {
                                Ok(plan) => {
                                    plan.op.apply_to(&mut inv);
                                    model[c] -= n;
                                }
                                Err(DomainError::NotFound { .. }) => prop_assert_eq!(model[c], 0),
                                Err(DomainError::InsufficientQuantity { held, .. }) => {
                                    prop_assert!(held < n);
                                    prop_assert_eq!(held, model[c]);
                                }
                                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                            }
                        }
                    }
                }

                prop_assert!(inv.values().all(|e| e.quantity > 0));
                for (c, forms) in concepts.iter().enumerate() {
                    let keys: Vec<_> = inv.iter().filter(|(k, _)| forms.names(k)).collect();
                    prop_assert!(keys.len() <= 1);
                    match keys.first() {
                        None => prop_assert_eq!(model[c], 0),
                        Some((key, entry)) => {
                            prop_assert_eq!(entry.quantity, model[c]);
                            prop_assert!(keys_match(key, forms.key_for(entry.quantity)));
                        }
                    }
                }
            }

            /// Property: adding n then removing n leaves no key for the concept.
            #[test]
            fn add_then_remove_round_trips(n in 1u64..1000) {
                let forms = ItemForms::new("arrow", "arrows").unwrap();
                let mut inv = Inventory::new();
                inv.insert("torch".to_string(), InventoryEntry::new(1));

                let q = Quantity::new(n).unwrap();
                plan_addition(&inv, &forms, q).unwrap().op.apply_to(&mut inv);
                plan_removal(&inv, &forms, "arrows", q).unwrap().op.apply_to(&mut inv);

                prop_assert!(!inv.keys().any(|k| forms.names(k)));
                prop_assert_eq!(inv.len(), 1);
            }
        }
    }
}

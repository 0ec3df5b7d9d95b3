//! Key resolution: find the stored key for an item concept.

use crate::entry::{GrammaticalNumber, Inventory, InventoryEntry, ItemForms, keys_match};

/// The stored entry for a concept, with the key in its original stored case.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub key: String,
    pub entry: InventoryEntry,
    /// Which of the two forms the stored key matched.
    pub matched: GrammaticalNumber,
}

/// Find the stored entry for `forms`, comparing keys case-insensitively.
///
/// The singular form is looked up first; the plural is only tried when no key matches
/// the singular. If an inventory holds both (which the mutation rules never produce),
/// the singular entry wins. Among keys that differ only by case, the first in key order
/// wins.
pub fn resolve(inventory: &Inventory, forms: &ItemForms) -> Option<ResolvedEntry> {
    [GrammaticalNumber::Singular, GrammaticalNumber::Plural]
        .into_iter()
        .find_map(|number| {
            let wanted = forms.form(number);
            inventory
                .iter()
                .find(|(key, _)| keys_match(key, wanted))
                .map(|(key, entry)| ResolvedEntry {
                    key: key.clone(),
                    entry: entry.clone(),
                    matched: number,
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms() -> ItemForms {
        ItemForms::new("sword", "swords").unwrap()
    }

    fn inventory(entries: &[(&str, u64)]) -> Inventory {
        entries
            .iter()
            .map(|(k, q)| (k.to_string(), InventoryEntry::new(*q)))
            .collect()
    }

    #[test]
    fn empty_inventory_resolves_nothing() {
        assert_eq!(resolve(&Inventory::new(), &forms()), None);
    }

    #[test]
    fn finds_plural_key_case_insensitively_and_keeps_stored_case() {
        let inv = inventory(&[("Shield", 1), ("SWORDS", 4)]);
        let found = resolve(&inv, &forms()).unwrap();
        assert_eq!(found.key, "SWORDS");
        assert_eq!(found.entry.quantity, 4);
        assert_eq!(found.matched, GrammaticalNumber::Plural);
    }

    #[test]
    fn singular_wins_when_both_forms_are_stored() {
        let inv = inventory(&[("swords", 3), ("Sword", 1)]);
        let found = resolve(&inv, &forms()).unwrap();
        assert_eq!(found.key, "Sword");
        assert_eq!(found.matched, GrammaticalNumber::Singular);
    }

    #[test]
    fn unrelated_keys_do_not_match() {
        let inv = inventory(&[("swordfish", 2), ("longsword", 1)]);
        assert_eq!(resolve(&inv, &forms()), None);
    }

    #[test]
    fn invariant_forms_resolve_as_singular() {
        let gold = ItemForms::new("gold", "gold").unwrap();
        let inv = inventory(&[("Gold", 30)]);
        let found = resolve(&inv, &gold).unwrap();
        assert_eq!(found.key, "Gold");
        assert_eq!(found.matched, GrammaticalNumber::Singular);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use quartermaster_core::{DomainError, DomainResult, ValueObject};

/// A user's inventory: stored key -> entry.
///
/// Keys are kept in their stored case; lookups by concept go through
/// [`crate::resolve`], which compares folded keys.
pub type Inventory = BTreeMap<String, InventoryEntry>;

/// A strictly positive amount of items, used for deltas.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: u64) -> DomainResult<Self> {
        if value == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<u64> for Quantity {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Stored record for one item concept.
///
/// Everything except `quantity` is free-form metadata that survives renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub quantity: u64,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl InventoryEntry {
    pub fn new(quantity: u64) -> Self {
        Self {
            quantity,
            metadata: BTreeMap::new(),
        }
    }

    /// Same entry (metadata included) with a different quantity.
    pub fn with_quantity(&self, quantity: u64) -> Self {
        Self {
            quantity,
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalNumber {
    Singular,
    Plural,
}

impl GrammaticalNumber {
    /// Number a key must carry for the given stored quantity (plural iff quantity != 1).
    pub fn for_quantity(quantity: u64) -> Self {
        if quantity == 1 {
            Self::Singular
        } else {
            Self::Plural
        }
    }
}

/// The singular and plural surface forms of one item concept, as produced by the
/// morphology oracle for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemForms {
    singular: String,
    plural: String,
}

impl ItemForms {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> DomainResult<Self> {
        let singular = singular.into().trim().to_string();
        let plural = plural.into().trim().to_string();
        if singular.is_empty() || plural.is_empty() {
            return Err(DomainError::validation("item forms cannot be empty"));
        }
        Ok(Self { singular, plural })
    }

    pub fn singular(&self) -> &str {
        &self.singular
    }

    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn form(&self, number: GrammaticalNumber) -> &str {
        match number {
            GrammaticalNumber::Singular => &self.singular,
            GrammaticalNumber::Plural => &self.plural,
        }
    }

    /// The key an entry holding `quantity` items must be stored under.
    pub fn key_for(&self, quantity: u64) -> &str {
        self.form(GrammaticalNumber::for_quantity(quantity))
    }

    /// Whether `key` names this concept in either number.
    pub fn names(&self, key: &str) -> bool {
        keys_match(key, &self.singular) || keys_match(key, &self.plural)
    }
}

impl ValueObject for ItemForms {}

/// Canonical case fold used for every key comparison.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

pub fn keys_match(a: &str, b: &str) -> bool {
    a == b || fold_case(a) == fold_case(b)
}

/// Normalization applied to item names before they reach the morphology oracle:
/// trimmed, internal whitespace collapsed to single spaces, case folded.
pub fn normalize_phrase(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    fold_case(&collapsed)
}

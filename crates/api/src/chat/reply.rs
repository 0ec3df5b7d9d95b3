//! Reply texts. Every user-visible string the bot sends is built here.

use quartermaster_infra::MutationError;
use quartermaster_inventory::{Inventory, MutationOutcome};

pub const EMPTY_INVENTORY: &str = "You have no items in your inventory.";

pub const INTERNAL_FAILURE: &str =
    "Something went wrong while updating the inventory. Please try again later.";

pub fn help(prefix: &str) -> String {
    format!(
        "Hi. If you haven't yet, type {p}initme to init your folder. Then, type \
         {p}add [quantity] <item> to add an item to your inventory, {p}remove [quantity] \
         <item> to take it out, and {p}inventory to see what you have.",
        p = prefix
    )
}

pub fn initialized(display_name: &str) -> String {
    format!("Inventory system initialized for {display_name}!")
}

pub fn usage(prefix: &str, command: &str) -> String {
    format!("Usage: {prefix}{command} [quantity] <item name> (quantity must be at least 1)")
}

/// `key: quantity` lines in key order.
pub fn inventory(inventory: &Inventory) -> String {
    if inventory.is_empty() {
        return EMPTY_INVENTORY.to_string();
    }
    inventory
        .iter()
        .map(|(key, entry)| format!("{key}: {}", entry.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn added(delta: u64, requested: &str, outcome: &MutationOutcome) -> String {
    format!(
        "Successfully added {delta} {requested}. You now have {} {}.",
        outcome.quantity, outcome.key
    )
}

pub fn removed(delta: u64, requested: &str, outcome: &MutationOutcome) -> String {
    if outcome.quantity == 0 {
        format!("Successfully removed {delta} {requested}. You have no {} left.", outcome.key)
    } else {
        format!(
            "Successfully removed {delta} {requested}. You now have {} {}.",
            outcome.quantity, outcome.key
        )
    }
}

/// First-person reply for a failed `.add`/`.remove`.
pub fn command_failure(err: &MutationError, prefix: &str, command: &str) -> String {
    match err {
        MutationError::NotFound { item } => format!("You don't have any {item}."),
        MutationError::InsufficientQuantity {
            key,
            held,
            requested,
        } => format!("You only have {held} {key}, so you can't remove {requested}."),
        MutationError::Validation(msg) => {
            format!("Can't {command} that: {msg}. {}", usage(prefix, command))
        }
        MutationError::InvariantViolation(_)
        | MutationError::Oracle(_)
        | MutationError::Store(_) => INTERNAL_FAILURE.to_string(),
    }
}

/// Third-person summary line for one item of a natural-language message.
pub fn actor_outcome(actor: &str, outcome: &MutationOutcome) -> String {
    if outcome.quantity == 0 {
        format!("{actor} has no {} left.", outcome.key)
    } else {
        format!("{actor} now has {} {}.", outcome.quantity, outcome.key)
    }
}

pub fn actor_failure(actor: &str, err: &MutationError) -> String {
    match err {
        MutationError::NotFound { item } => format!("{actor} has no {item} to lose."),
        MutationError::InsufficientQuantity {
            key,
            held,
            requested,
        } => format!("{actor} only has {held} {key}, so {actor} can't lose {requested}."),
        MutationError::Validation(msg) => format!("Skipped an item for {actor}: {msg}."),
        MutationError::InvariantViolation(_)
        | MutationError::Oracle(_)
        | MutationError::Store(_) => INTERNAL_FAILURE.to_string(),
    }
}

pub fn nothing_to_record(actor: &str, verb: &str) -> String {
    format!("Nothing to record: no items found after \"{actor} {verb}\".")
}

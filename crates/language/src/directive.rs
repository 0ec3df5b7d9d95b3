use serde::{Deserialize, Serialize};

/// One (quantity, item name) pair produced by either grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub quantity: u64,
    pub item_name: String,
}

impl ParsedItem {
    pub fn new(quantity: u64, item_name: impl Into<String>) -> Self {
        Self {
            quantity,
            item_name: item_name.into(),
        }
    }
}

/// Parse `[quantity] item name`.
///
/// A leading run of ASCII digits followed by whitespace is the quantity; everything after
/// it is the item name. Without such a run (or when the digits overflow `u64`) the
/// quantity is 1 and the whole trimmed input is the name. Never fails; a zero quantity or
/// an empty name is for the caller to reject.
pub fn parse_directive(input: &str) -> ParsedItem {
    let trimmed = input.trim();

    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, rest) = trimmed.split_at(digits_end);

    if !digits.is_empty() && rest.starts_with(char::is_whitespace) {
        if let Ok(quantity) = digits.parse::<u64>() {
            return ParsedItem::new(quantity, rest.trim());
        }
    }

    ParsedItem::new(1, trimmed)
}

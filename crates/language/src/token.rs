//! Item tokens inside a segment.
//!
//! In free text, item names are written capitalized: an item is a run of capitalized
//! words, optionally preceded by an integer quantity. Lowercase words (articles, filler)
//! never start an item and end the current one.

use crate::directive::ParsedItem;

/// Characters trimmed off the end of an item name (sentence punctuation).
const TRAILING_PUNCTUATION: &[char] = &['.', '!', '?', ';', ':', '"', '\''];

/// A word that may start or continue an item name: first character uppercase.
pub fn is_name_word(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// A word that is an integer quantity.
pub fn is_quantity_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Extract every item token from one segment, left to right.
///
/// A quantity applies only when it is the word immediately before the name run. Zero
/// quantities, and digit runs too large for `u64`, drop the item.
pub fn items_in_segment(segment: &str) -> Vec<ParsedItem> {
    let words: Vec<(usize, &str)> = word_spans(segment).collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < words.len() {
        if !is_name_word(words[i].1) {
            i += 1;
            continue;
        }

        let first = i;
        while i + 1 < words.len() && is_name_word(words[i + 1].1) {
            i += 1;
        }
        let (start, _) = words[first];
        let (last_start, last_word) = words[i];
        let name =
            segment[start..last_start + last_word.len()].trim_end_matches(TRAILING_PUNCTUATION);
        i += 1;

        let quantity = match first.checked_sub(1).map(|p| words[p].1) {
            Some(word) if is_quantity_word(word) => word.parse::<u64>().ok(),
            _ => Some(1),
        };

        match quantity {
            Some(q) if q > 0 && !name.is_empty() => items.push(ParsedItem::new(q, name)),
            _ => {}
        }
    }

    items
}

/// Whitespace-separated words with their byte offsets.
fn word_spans(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.split_whitespace().map(move |w| {
        let offset = w.as_ptr() as usize - s.as_ptr() as usize;
        (offset, w)
    })
}

//! Item-list segmentation.
//!
//! An item list such as ` 3 Swords, a Shield, and 2 Potions.` is cut into segments at
//! terminal boundaries. Each boundary kind is a separate predicate in [`BOUNDARY_RULES`];
//! at every position the rules are tried in table order and the first match wins.

/// Words that end a segment when they appear as whole, lowercase words.
pub const CONJUNCTIONS: &[&str] = &[
    "for", "as", "but", "though", "although", "while", "when", "if", "because", "since",
    "after", "before", "during", "from", "with", "by", "to", "at", "in", "on", "of", "that",
    "which", "who", "whom", "whose", "where", "how", "why", "what",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// `,` optionally followed by `and`.
    Comma,
    /// `.` that ends a sentence rather than sitting inside an abbreviation.
    SentencePeriod,
    /// The word `and`.
    And,
    /// A subordinating conjunction from [`CONJUNCTIONS`].
    Conjunction,
}

/// A boundary predicate: given the text and a char-aligned byte offset, returns how many
/// bytes the boundary consumes, or `None` if it does not start there.
pub type BoundaryRule = fn(&str, usize) -> Option<usize>;

pub const BOUNDARY_RULES: &[(Boundary, BoundaryRule)] = &[
    (Boundary::Comma, comma),
    (Boundary::SentencePeriod, sentence_period),
    (Boundary::And, and_word),
    (Boundary::Conjunction, conjunction),
];

/// The first boundary starting at `at`, with the number of bytes it consumes.
pub fn boundary_at(text: &str, at: usize) -> Option<(Boundary, usize)> {
    BOUNDARY_RULES
        .iter()
        .find_map(|(kind, rule)| rule(text, at).map(|len| (*kind, len)))
}

/// Split `text` into segments, left to right. End of text closes the last segment.
/// Segments are returned untrimmed and may be blank.
pub fn segments(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut at = 0;

    while at < text.len() {
        if let Some((_, len)) = boundary_at(text, at) {
            out.push(&text[start..at]);
            at += len;
            start = at;
            continue;
        }
        at += text[at..].chars().next().map_or(1, char::len_utf8);
    }

    out.push(&text[start..]);
    out
}

/// `,` plus an optional trailing `and` (`, and` is one boundary, not two).
pub fn comma(text: &str, at: usize) -> Option<usize> {
    if !text[at..].starts_with(',') {
        return None;
    }
    let after = at + 1;
    let ws = leading_whitespace(&text[after..]);
    if ws > 0 && word_at(text, after + ws, "and") {
        return Some(1 + ws + "and".len());
    }
    Some(1)
}

/// A period immediately followed by the end of text, a lowercase letter, or an uppercase
/// letter that starts a lowercase run. Any other period, such as the ones in `U.S. Flag`
/// or `U.S.A`, stays inside the segment.
pub fn sentence_period(text: &str, at: usize) -> Option<usize> {
    if !text[at..].starts_with('.') {
        return None;
    }
    let mut chars = text[at + 1..].chars();
    let ends_sentence = match chars.next() {
        None => true,
        Some(c) if c.is_lowercase() => true,
        Some(c) if c.is_uppercase() => chars.next().is_some_and(char::is_lowercase),
        Some(_) => false,
    };
    ends_sentence.then_some(1)
}

/// The literal ` and `: a space on each side, so `Bread-and-Butter` stays one name.
pub fn and_word(text: &str, at: usize) -> Option<usize> {
    let spaced = text[..at].ends_with(' ')
        && text[at..].starts_with("and")
        && text[at + "and".len()..].starts_with(' ');
    spaced.then_some("and".len())
}

pub fn conjunction(text: &str, at: usize) -> Option<usize> {
    CONJUNCTIONS
        .iter()
        .find(|word| word_at(text, at, word))
        .map(|word| word.len())
}

/// Whether `word` occurs at `at` as a whole word (case-sensitive).
pub fn word_at(text: &str, at: usize, word: &str) -> bool {
    if !text[at..].starts_with(word) {
        return false;
    }
    let before_ok = !text[..at].chars().next_back().is_some_and(char::is_alphanumeric);
    let after_ok = !text[at + word.len()..]
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric);
    before_ok && after_ok
}

/// Byte offset just past the first word that ends a sentence, or `text.len()`.
///
/// A word ends a sentence when it ends in `.`, `!` or `?` and is not an abbreviation:
/// its stem neither contains a period (`U.S.`) nor is a single letter (`J.`). Item
/// extraction stops there, so `3 Swords. Then she left` yields only the swords.
pub fn sentence_end(text: &str) -> usize {
    for word in text.split_whitespace() {
        let stem = word.trim_end_matches(['.', '!', '?']);
        if stem.len() == word.len() {
            continue;
        }
        let abbreviation = stem.contains('.') || stem.chars().count() == 1;
        if !abbreviation {
            let offset = word.as_ptr() as usize - text.as_ptr() as usize;
            return offset + word.len();
        }
    }
    text.len()
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmed(text: &str) -> Vec<&str> {
        segments(text).into_iter().map(str::trim).collect()
    }

    #[test]
    fn comma_and_counts_as_one_boundary() {
        assert_eq!(
            trimmed(" 3 Swords, a Shield, and 2 Potions."),
            vec!["3 Swords", "a Shield", "2 Potions", ""]
        );
    }

    #[test]
    fn bare_and_splits() {
        assert_eq!(trimmed("Bread and Cheese"), vec!["Bread", "Cheese"]);
    }

    #[test]
    fn and_inside_a_word_does_not_split() {
        assert_eq!(trimmed("2 Candles"), vec!["2 Candles"]);
        assert_eq!(trimmed("Sandals"), vec!["Sandals"]);
    }

    #[test]
    fn capitalized_conjunctions_stay_in_the_name() {
        assert_eq!(trimmed("Sword Of Flames"), vec!["Sword Of Flames"]);
        assert_eq!(trimmed("Sword of Flames"), vec!["Sword", "Flames"]);
    }

    #[test]
    fn every_conjunction_is_a_boundary() {
        for word in CONJUNCTIONS {
            let text = format!("Rope {word} Lantern");
            assert_eq!(trimmed(&text), vec!["Rope", "Lantern"], "conjunction {word}");
        }
    }

    #[test]
    fn abbreviation_periods_are_internal() {
        assert_eq!(trimmed("1 U.S.A Flag"), vec!["1 U.S.A Flag"]);
        assert_eq!(trimmed("1 U.S. Flag"), vec!["1 U.S. Flag"]);
        assert_eq!(trimmed("J.R.R Tolkien Book"), vec!["J.R.R Tolkien Book"]);
    }

    #[test]
    fn sentence_periods_split() {
        assert_eq!(trimmed("Gold.Then she left"), vec!["Gold", "Then she left"]);
        assert_eq!(trimmed("Gold.and more"), vec!["Gold", "", "more"]);
    }

    #[test]
    fn period_before_a_space_is_internal() {
        assert_eq!(trimmed("Gold. Then"), vec!["Gold. Then"]);
    }

    #[test]
    fn and_needs_a_space_on_each_side() {
        assert_eq!(trimmed("2 Bread-and-Butter"), vec!["2 Bread-and-Butter"]);
        assert_eq!(trimmed("Rope and\tLamp"), vec!["Rope and\tLamp"]);
        assert_eq!(boundary_at(" and x", 1), Some((Boundary::And, 3)));
        assert_eq!(boundary_at("and x", 0), None);
    }

    #[test]
    fn sentence_end_skips_abbreviations() {
        let text = " 3 Swords. Then she left.";
        assert_eq!(&text[..sentence_end(text)], " 3 Swords.");
        let text = " 1 U.S. Flag and J. Smith Portrait! More";
        assert_eq!(&text[..sentence_end(text)], " 1 U.S. Flag and J. Smith Portrait!");
        assert_eq!(sentence_end(" 2 Ropes"), " 2 Ropes".len());
    }

    #[test]
    fn period_before_digit_is_internal() {
        assert_eq!(trimmed("Version 2.5 Blade"), vec!["Version 2.5 Blade"]);
    }

    #[test]
    fn rules_are_tried_in_table_order() {
        assert_eq!(boundary_at(", and x", 0), Some((Boundary::Comma, 5)));
        assert_eq!(boundary_at(" and x", 1), Some((Boundary::And, 3)));
        assert_eq!(boundary_at("with x", 0), Some((Boundary::Conjunction, 4)));
        assert_eq!(boundary_at("Sword", 0), None);
    }

    #[test]
    fn multibyte_text_is_walked_safely() {
        assert_eq!(trimmed("Épée, Bâton"), vec!["Épée", "Bâton"]);
    }
}

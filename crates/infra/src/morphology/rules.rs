//! Deterministic English noun inflection.
//!
//! A small rule set: irregular pairs, uncountable nouns, then suffix rules. In a phrase
//! like "potion of healing" only the head noun (the word before the first "of") is
//! inflected; otherwise the last word is. Input is expected to be normalized (lowercase,
//! single spaces).
//!
//! Both directions are idempotent: pluralizing a plural or singularizing a singular
//! returns it unchanged.

use async_trait::async_trait;

use super::r#trait::{MorphologyOracle, OracleError};

const IRREGULAR: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("person", "people"),
    ("ox", "oxen"),
    ("knife", "knives"),
    ("life", "lives"),
    ("wife", "wives"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("wolf", "wolves"),
    ("elf", "elves"),
    ("dwarf", "dwarves"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("scarf", "scarves"),
    ("staff", "staves"),
    ("die", "dice"),
    ("cactus", "cacti"),
    ("fungus", "fungi"),
    ("tomato", "tomatoes"),
    ("potato", "potatoes"),
    ("hero", "heroes"),
    ("torpedo", "torpedoes"),
];

const UNCOUNTABLE: &[&str] = &[
    "gold", "silver", "copper", "armor", "armour", "equipment", "gear", "rice", "water",
    "sheep", "fish", "deer", "moose", "ammo", "money", "information", "furniture", "jewelry",
    "mana", "loot", "series", "species", "news",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedOracle;

impl RuleBasedOracle {
    pub fn new() -> Self {
        Self
    }

    pub fn pluralize_phrase(phrase: &str) -> String {
        inflect_head(phrase, plural_word)
    }

    pub fn singularize_phrase(phrase: &str) -> String {
        inflect_head(phrase, singular_word)
    }
}

#[async_trait]
impl MorphologyOracle for RuleBasedOracle {
    async fn pluralize(&self, phrase: &str) -> Result<String, OracleError> {
        Ok(Self::pluralize_phrase(phrase))
    }

    async fn singularize(&self, phrase: &str) -> Result<String, OracleError> {
        Ok(Self::singularize_phrase(phrase))
    }
}

fn inflect_head(phrase: &str, inflect: fn(&str) -> String) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let Some(last) = words.len().checked_sub(1) else {
        return String::new();
    };
    let head = match words.iter().position(|w| *w == "of") {
        Some(i) if i > 0 => i - 1,
        _ => last,
    };

    words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == head { inflect(w) } else { (*w).to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

fn plural_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return (*plural).to_string();
    }
    if looks_plural(word) {
        return word.to_string();
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

fn singular_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *s == word || *p == word) {
        return (*singular).to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if looks_plural(word) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Ends in a plural `s` rather than a singular `-ss`, `-us` or `-is`.
fn looks_plural(word: &str) -> bool {
    word.len() > 2
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[
        ("sword", "swords"),
        ("shield", "shields"),
        ("potion of healing", "potions of healing"),
        ("ring of power", "rings of power"),
        ("glass", "glasses"),
        ("box", "boxes"),
        ("torch", "torches"),
        ("berry", "berries"),
        ("key", "keys"),
        ("knife", "knives"),
        ("dwarf", "dwarves"),
        ("gold", "gold"),
        ("iron crown", "iron crowns"),
        ("horse", "horses"),
    ];

    #[test]
    fn inflects_known_pairs_both_ways() {
        for (singular, plural) in PAIRS {
            let got = RuleBasedOracle::pluralize_phrase(singular);
            assert_eq!(got, *plural, "pluralize {singular}");
            let got = RuleBasedOracle::singularize_phrase(plural);
            assert_eq!(got, *singular, "singularize {plural}");
        }
    }

    #[test]
    fn inflection_is_idempotent() {
        for (singular, plural) in PAIRS {
            assert_eq!(RuleBasedOracle::pluralize_phrase(plural), *plural);
            assert_eq!(RuleBasedOracle::singularize_phrase(singular), *singular);
        }
    }

    #[test]
    fn leading_of_does_not_pick_the_head() {
        assert_eq!(RuleBasedOracle::pluralize_phrase("of mice"), "of mice");
        assert_eq!(RuleBasedOracle::pluralize_phrase(""), "");
    }

    #[tokio::test]
    async fn oracle_port_answers_with_rules() {
        let oracle = RuleBasedOracle::new();
        assert_eq!(oracle.pluralize("arrow").await.unwrap(), "arrows");
        assert_eq!(oracle.singularize("arrows").await.unwrap(), "arrow");
    }
}

//! Third-person item extraction: `<DisplayName> gains|loses <item list>`.

use serde::{Deserialize, Serialize};

use quartermaster_core::{ActorReference, UserId};

use crate::directive::ParsedItem;
use crate::segment::{segments, sentence_end, word_at};
use crate::token::items_in_segment;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Gains,
    Loses,
}

/// Accepted trigger spellings. Mixed case (`Gains`) is deliberately not recognized.
pub const TRIGGER_VERBS: &[(&str, Trigger)] = &[
    ("gains", Trigger::Gains),
    ("GAINS", Trigger::Gains),
    ("loses", Trigger::Loses),
    ("LOSES", Trigger::Loses),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub actor: UserId,
    pub display_name: String,
    pub trigger: Trigger,
    /// Items in the order they appear in the text. May be empty.
    pub items: Vec<ParsedItem>,
}

/// Cheap check whether `text` contains any trigger verb as a whole word.
///
/// Lets callers skip loading the actor directory for ordinary chatter.
pub fn mentions_trigger(text: &str) -> bool {
    text.char_indices()
        .any(|(at, _)| TRIGGER_VERBS.iter().any(|(verb, _)| word_at(text, at, verb)))
}

/// Find the first `<display name> <trigger>` in `text` and extract the items after it.
///
/// Display names match case-sensitively and must start at a word boundary; one or more
/// whitespace characters separate the name from the verb. The earliest position in the
/// text wins; at a single position, the first directory entry (in the order given) wins,
/// so a name that is a prefix of another can shadow it. Items are read up to the end of
/// the sentence that holds the match. Returns `None` when nothing matches.
pub fn extract(text: &str, directory: &[ActorReference]) -> Option<Extraction> {
    let (actor, trigger, items_start) = find_actor_trigger(text, directory)?;
    let items_text = &text[items_start..];
    let items = segments(&items_text[..sentence_end(items_text)])
        .into_iter()
        .flat_map(items_in_segment)
        .collect();

    Some(Extraction {
        actor: actor.store_key.clone(),
        display_name: actor.display_name.clone(),
        trigger,
        items,
    })
}

/// Returns the matched actor, the trigger, and the byte offset just past the verb.
fn find_actor_trigger<'a>(
    text: &str,
    directory: &'a [ActorReference],
) -> Option<(&'a ActorReference, Trigger, usize)> {
    for (at, _) in text.char_indices() {
        if text[..at].chars().next_back().is_some_and(char::is_alphanumeric) {
            continue;
        }
        for actor in directory {
            if let Some((trigger, end)) = trigger_after_name(text, at, &actor.display_name) {
                return Some((actor, trigger, end));
            }
        }
    }
    None
}

fn trigger_after_name(text: &str, at: usize, name: &str) -> Option<(Trigger, usize)> {
    if name.is_empty() || !text[at..].starts_with(name) {
        return None;
    }
    let after_name = at + name.len();
    let rest = &text[after_name..];
    let gap = rest.len() - rest.trim_start().len();
    if gap == 0 {
        return None;
    }
    let verb_at = after_name + gap;
    TRIGGER_VERBS
        .iter()
        .find(|(verb, _)| word_at(text, verb_at, verb))
        .map(|(verb, trigger)| (*trigger, verb_at + verb.len()))
}

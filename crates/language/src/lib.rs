//! Chat text parsing.
//!
//! Two grammars turn chat text into [`ParsedItem`]s:
//! - [`parse_directive`]: first-person commands such as `3 Swords`.
//! - [`extract`]: third-person sentences such as
//!   `Alice gains 3 Swords, a Shield, and 2 Potions.`
//!
//! Both are pure functions; resolving actors to inventories and applying the items is
//! left to the caller.

pub mod directive;
pub mod extractor;
pub mod segment;
pub mod token;

pub use directive::{ParsedItem, parse_directive};
pub use extractor::{Extraction, Trigger, extract, mentions_trigger};

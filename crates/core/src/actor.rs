//! Actor directory entries.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Maps a presentation name ("Alice") to the stable identity its inventory is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorReference {
    pub display_name: String,
    pub store_key: UserId,
}

impl ActorReference {
    pub fn new(display_name: impl Into<String>, store_key: UserId) -> Self {
        Self {
            display_name: display_name.into(),
            store_key,
        }
    }
}

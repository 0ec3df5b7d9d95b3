use serde::{Deserialize, Serialize};

use quartermaster_core::UserId;
use quartermaster_inventory::Inventory;

use crate::chat::ChatMessage;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub author_id: String,
    #[serde(default)]
    pub author_name: String,
    pub content: String,
}

impl PostMessageRequest {
    pub fn into_message(self) -> Result<ChatMessage, String> {
        let author_id = UserId::new(self.author_id).map_err(|e| e.to_string())?;
        Ok(ChatMessage {
            author_id,
            author_name: self.author_name,
            content: self.content,
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageReplyResponse {
    pub reply: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InventoryItemResponse {
    pub key: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub user_id: String,
    pub display_name: String,
    pub items: Vec<InventoryItemResponse>,
}

pub fn inventory_to_json(
    user: &UserId,
    display_name: &str,
    inventory: Inventory,
) -> InventoryResponse {
    InventoryResponse {
        user_id: user.to_string(),
        display_name: display_name.to_string(),
        items: inventory
            .into_iter()
            .map(|(key, entry)| InventoryItemResponse {
                key,
                quantity: entry.quantity,
            })
            .collect(),
    }
}

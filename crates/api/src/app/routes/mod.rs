use axum::{
    routing::{get, post},
    Router,
};

pub mod inventory;
pub mod messages;
pub mod system;

/// Router for the chat and inventory endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/messages", post(messages::post_message))
        .route("/users/:id/inventory", get(inventory::get_inventory))
}

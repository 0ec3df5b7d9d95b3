use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Feed one chat message to the dispatcher. A `null` reply means the bot stays silent.
pub async fn post_message(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PostMessageRequest>,
) -> axum::response::Response {
    let message = match body.into_message() {
        Ok(m) => m,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_author", msg),
    };

    let reply = services.dispatcher.handle(&message).await;
    (StatusCode::OK, Json(dto::MessageReplyResponse { reply })).into_response()
}

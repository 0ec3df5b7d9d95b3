use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use quartermaster_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn get_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user = match UserId::new(id) {
        Ok(u) => u,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    let profile = match services.directory().profile(&user).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user has not run initme")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.store().get_all(&user).await {
        Ok(inventory) => (
            StatusCode::OK,
            Json(dto::inventory_to_json(&user, &profile.display_name, inventory)),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::warn;

use quartermaster_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    warn!(error = %err, "store failure while serving request");
    match err {
        StoreError::Backend(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
        StoreError::Corrupt(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_corrupt", msg)
        }
        StoreError::Poisoned => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "store lock poisoned",
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub mod advisory;
pub mod backend;
pub mod pump;
pub mod relay;
pub mod sensor;

pub use advisory::AdvisoryError;
pub use backend::BackendError;
pub use pump::PumpError;
pub use relay::RelayError;
pub use sensor::SensorError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// Failures surfaced over the HTTP interface.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Advisory error: {0}")]
    AdvisoryError(#[from] AdvisoryError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_id) = match self {
            ApiError::AdvisoryError(e) => (e.status_code(), e.to_string(), None),
            ApiError::InternalError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({ "error": error_obj }));

        (status, body).into_response()
    }
}

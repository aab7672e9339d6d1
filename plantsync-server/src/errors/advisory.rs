use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory service is not configured")]
    Disabled,

    #[error("request body is missing sensor_data")]
    MissingSensorData,

    #[error("advisory request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("advisory response was malformed: {0}")]
    BadResponse(String),
}

impl AdvisoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdvisoryError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            AdvisoryError::MissingSensorData => StatusCode::BAD_REQUEST,
            AdvisoryError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AdvisoryError::BadResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

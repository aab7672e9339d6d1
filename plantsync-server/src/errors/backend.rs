use plantsync_api::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status}")]
    Status { status: u16 },
}

impl BackendError {
    /// Wire code for the response envelope: timeouts keep their own code,
    /// everything else is an API failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            BackendError::Http(e) if e.is_timeout() => ErrorCode::CommandTimeout,
            _ => ErrorCode::ApiError,
        }
    }
}

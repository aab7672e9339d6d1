use plantsync_api::ErrorCode;
use plantsync_api::rules::PumpRuleError;

use super::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    #[error(transparent)]
    Rule(#[from] PumpRuleError),

    #[error("missing device MAC address")]
    MissingDeviceId,

    #[error("invalid device MAC address: {mac}")]
    InvalidMac { mac: String },

    #[error("pump is already running")]
    AlreadyRunning,

    #[error("pump is already stopped")]
    AlreadyStopped,

    #[error("cannot set flow while the pump is stopped")]
    NotRunning,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PumpError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            PumpError::Rule(e) => e.error_code(),
            PumpError::MissingDeviceId | PumpError::InvalidMac { .. } => {
                ErrorCode::MissingDeviceId
            }
            PumpError::AlreadyRunning => ErrorCode::PumpAlreadyRunning,
            PumpError::AlreadyStopped => ErrorCode::PumpAlreadyStopped,
            PumpError::NotRunning => ErrorCode::PumpNotRunning,
            PumpError::Backend(e) => e.error_code(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Error discriminators carried in response envelopes.
///
/// Serialized as the `SCREAMING_SNAKE_CASE` strings devices and the backend
/// already key on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Command not in the supported set.
    InvalidCommand,
    /// Parameter failed its type or range rule.
    InvalidParams,
    /// `start` while the pump is already running.
    PumpAlreadyRunning,
    /// `stop` while the pump is already stopped.
    PumpAlreadyStopped,
    /// `set_flow` requires a running pump.
    PumpNotRunning,
    /// Frame arrived without a device MAC address.
    MissingDeviceId,
    /// Backend API call failed.
    ApiError,
    /// Backend API call did not complete in time.
    CommandTimeout,
    /// Frame type the gateway does not handle.
    UnknownMessageType,
    /// Unclassified handler failure.
    ProcessingError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCommand => "INVALID_COMMAND",
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::PumpAlreadyRunning => "PUMP_ALREADY_RUNNING",
            ErrorCode::PumpAlreadyStopped => "PUMP_ALREADY_STOPPED",
            ErrorCode::PumpNotRunning => "PUMP_NOT_RUNNING",
            ErrorCode::MissingDeviceId => "MISSING_DEVICE_ID",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::CommandTimeout => "COMMAND_TIMEOUT",
            ErrorCode::UnknownMessageType => "UNKNOWN_MESSAGE_TYPE",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_as_str() {
        for code in [
            ErrorCode::InvalidCommand,
            ErrorCode::PumpAlreadyRunning,
            ErrorCode::UnknownMessageType,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, alloc::format!("\"{}\"", code.as_str()));
        }
    }
}

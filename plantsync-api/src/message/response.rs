use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{ErrorCode, ResponseStatus};
use crate::models::PumpState;

/// Frames the gateway sends back to a device connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Handshake acknowledgement.
    HelloAck {
        transport: String,
        timestamp: f64,
    },
    /// Outcome of a `sensor_data` frame.
    SensorDataResponse {
        status: ResponseStatus,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        device_id: Option<String>,
        /// Metric names accepted by the validation table.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        received_sensors: Vec<String>,
        timestamp: f64,
    },
    /// Outcome of a `pump_control` frame.
    PumpResponse {
        status: ResponseStatus,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_code: Option<ErrorCode>,
        /// Pump state after the command was applied (or the state that
        /// caused a rejection).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_state: Option<PumpState>,
        timestamp: f64,
    },
    /// Reply to a `pump_status_request`.
    PumpStatusResponse {
        status: ResponseStatus,
        device_id: String,
        state: PumpState,
        timestamp: f64,
    },
}

impl ServerMessage {
    /// Error envelope for a rejected pump command.
    pub fn pump_error(
        code: ErrorCode,
        message: String,
        state: Option<PumpState>,
        timestamp: f64,
    ) -> Self {
        ServerMessage::PumpResponse {
            status: ResponseStatus::Error,
            message,
            error_code: Some(code),
            current_state: state,
            timestamp,
        }
    }

    /// Error envelope for a rejected telemetry frame.
    pub fn sensor_error(message: String, timestamp: f64) -> Self {
        ServerMessage::SensorDataResponse {
            status: ResponseStatus::Error,
            message,
            device_id: None,
            received_sensors: Vec::new(),
            timestamp,
        }
    }
}

/// A metric value that passed validation, with its unit attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedValue {
    pub value: f64,
    pub unit: String,
    pub timestamp: f64,
}

mod control;
mod device;
mod error;
mod response;

pub use control::ControlCommand;
pub use device::{DeviceHello, DeviceInfo, DeviceMessage, PumpCommand, PumpParams};
pub use error::ErrorCode;
pub use response::{ServerMessage, ValidatedValue};

use serde::{Deserialize, Serialize};

/// Outcome marker carried by every response envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

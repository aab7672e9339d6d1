use alloc::string::String;

use serde::{Deserialize, Serialize};

use super::device::{DeviceMessage, PumpCommand, PumpParams};

/// Control command published by the backend on the Redis channel.
///
/// Field names follow the backend's camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlCommand {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub actuator_code: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: PumpParams,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl ControlCommand {
    /// Translate into the WebSocket frame delivered to the device, or
    /// `None` when a required field is missing.
    pub fn into_device_message(self, fallback_timestamp: f64) -> Option<(String, DeviceMessage)> {
        let device_id = self.device_id.filter(|id| !id.is_empty())?;
        self.actuator_code.filter(|code| !code.is_empty())?;
        let action = self.action.filter(|action| !action.is_empty())?;

        let message = DeviceMessage::PumpControl {
            mac_address: device_id.clone(),
            timestamp: Some(self.timestamp.unwrap_or(fallback_timestamp)),
            command: PumpCommand {
                action,
                params: self.parameters,
            },
        };

        Some((device_id, message))
    }
}

use alloc::collections::BTreeMap;
use alloc::string::String;

use serde::{Deserialize, Serialize};

/// Messages a device may send to the gateway over WebSocket.
///
/// All frames are JSON objects discriminated by a `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceMessage {
    /// Connection handshake, sent once after the socket opens.
    Hello(DeviceHello),
    /// Telemetry report with one value per metric.
    SensorData {
        /// Report time as Unix seconds. Stamped by the gateway when absent.
        #[serde(default)]
        timestamp: Option<f64>,
        device_info: DeviceInfo,
        /// Metric name to raw value, e.g. `"temperature": 23.4`.
        sensor_values: BTreeMap<String, f64>,
    },
    /// Pump actuation request or backend-relayed command.
    PumpControl {
        mac_address: String,
        #[serde(default)]
        timestamp: Option<f64>,
        command: PumpCommand,
    },
    /// Query for the current pump state of a device.
    PumpStatusRequest {
        mac_address: String,
        #[serde(default)]
        timestamp: Option<f64>,
    },
}

/// Handshake payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceHello {
    pub version: u8,
    /// Capability flags such as `sensor_data` or `mcp`.
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    #[serde(default)]
    pub transport: Option<String>,
    pub device_info: DeviceInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
}

/// A pump command as carried on the wire. The action is kept as a plain
/// string so unsupported commands reach the rule table instead of failing
/// at the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpCommand {
    pub action: String,
    #[serde(default)]
    pub params: PumpParams,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PumpParams {
    /// Requested flow in L/min.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f64>,
    /// Run time in seconds; zero means run until stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

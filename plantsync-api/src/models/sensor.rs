use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Telemetry batch in the shape the backend ingest endpoint expects:
/// sensor codes rather than metric names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReport {
    pub mac_address: String,
    pub timestamp: f64,
    pub sensors: Vec<SensorValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorValue {
    /// Backend sensor code, e.g. `temp_01`.
    pub sensor_code: String,
    pub value: f64,
}

/// Backend sensor code for a metric name. Unmapped metrics pass through
/// unchanged.
pub fn sensor_code(metric: &str) -> String {
    match metric {
        "temperature" => "temp_01",
        "humidity" => "humi_01",
        "light" => "light_01",
        "motion" => "motion_01",
        "air_quality" => "air_quality_01",
        "co2" => "co2_01",
        other => other,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_metrics_map_to_codes() {
        assert_eq!(sensor_code("temperature"), "temp_01");
        assert_eq!(sensor_code("humidity"), "humi_01");
        assert_eq!(sensor_code("battery_level"), "battery_level");
    }
}

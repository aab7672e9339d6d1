use std::collections::BTreeMap;
use std::sync::Arc;

use plantsync_api::message::{DeviceInfo, ServerMessage, ValidatedValue};
use plantsync_api::models::{sensor_code, SensorReport, SensorValue};
use plantsync_api::rules::{validate_device_info, validate_sensor_value};
use plantsync_api::ResponseStatus;

use crate::errors::SensorError;
use crate::services::{BackendClient, SensorHistory, SensorSnapshot};
use crate::unix_now;

/// Process one `sensor_data` frame: validate, historize, forward.
///
/// Forwarding is best effort. The device has already produced the reading;
/// a backend outage is logged but does not turn the frame into an error.
pub async fn handle_sensor_data(
    history: &SensorHistory,
    backend: &Arc<dyn BackendClient>,
    timestamp: Option<f64>,
    device_info: &DeviceInfo,
    sensor_values: &BTreeMap<String, f64>,
) -> ServerMessage {
    let now = unix_now();
    let timestamp = timestamp.unwrap_or(now);

    let device_id = match validate_device_info(device_info) {
        Ok(id) => id.to_string(),
        Err(e) => {
            let error = SensorError::DeviceInfo(e);
            tracing::warn!("rejecting sensor frame: {}", error);
            return ServerMessage::sensor_error(error.to_string(), now);
        }
    };

    let mut validated = BTreeMap::new();
    for (metric, value) in sensor_values {
        match validate_sensor_value(metric, *value) {
            Ok(rule) => {
                validated.insert(
                    metric.clone(),
                    ValidatedValue {
                        value: *value,
                        unit: rule.unit.to_string(),
                        timestamp,
                    },
                );
            }
            Err(e) => {
                let error = SensorError::Value(e);
                tracing::warn!("rejecting sensor frame from {}: {}", device_id, error);
                return ServerMessage::sensor_error(error.to_string(), now);
            }
        }
    }

    let received_sensors: Vec<String> = validated.keys().cloned().collect();

    history
        .record(
            &device_id,
            SensorSnapshot {
                timestamp,
                values: validated,
            },
        )
        .await;

    let report = SensorReport {
        mac_address: device_id.clone(),
        timestamp,
        sensors: sensor_values
            .iter()
            .map(|(metric, value)| SensorValue {
                sensor_code: sensor_code(metric),
                value: *value,
            })
            .collect(),
    };

    if let Err(e) = backend.ingest_sensor_report(&report).await {
        tracing::error!("failed to forward sensor report from {}: {}", device_id, e);
    }

    ServerMessage::SensorDataResponse {
        status: ResponseStatus::Success,
        message: format!("received {} sensor value(s)", received_sensors.len()),
        device_id: Some(device_id),
        received_sensors,
        timestamp: now,
    }
}

use std::time::Duration;

use async_trait::async_trait;
use plantsync_api::message::PumpParams;
use plantsync_api::models::SensorReport;
use plantsync_api::rules::PumpAction;
use serde_json::json;

use crate::configs::Backend;
use crate::errors::BackendError;

/// Client for the management backend. The gateway forwards validated
/// telemetry and accepted pump commands through this seam; tests and the
/// mock tooling substitute their own implementation.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn ingest_sensor_report(&self, report: &SensorReport) -> Result<(), BackendError>;

    async fn send_pump_command(
        &self,
        device_id: &str,
        action: PumpAction,
        params: &PumpParams,
    ) -> Result<(), BackendError>;
}

pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(config: &Backend) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build backend HTTP client");

        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn ingest_sensor_report(&self, report: &SensorReport) -> Result<(), BackendError> {
        let response = self
            .http
            .post(format!("{}/sensor/ingest", self.base_url))
            .json(report)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    async fn send_pump_command(
        &self,
        device_id: &str,
        action: PumpAction,
        params: &PumpParams,
    ) -> Result<(), BackendError> {
        let response = self
            .http
            .post(format!("{}/actuator/pump/command", self.base_url))
            .json(&json!({
                "deviceId": device_id,
                "action": action.as_str(),
                "parameters": params,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status().as_u16(),
            });
        }

        tracing::info!("pump command forwarded to backend: {} {}", device_id, action);
        Ok(())
    }
}

/// No-op client used when no backend is configured; everything is accepted
/// and logged, mirroring a gateway running against mock data only.
pub struct DisabledBackend;

#[async_trait]
impl BackendClient for DisabledBackend {
    async fn ingest_sensor_report(&self, report: &SensorReport) -> Result<(), BackendError> {
        tracing::debug!(
            "backend disabled, dropping report from {} with {} sensor(s)",
            report.mac_address,
            report.sensors.len()
        );
        Ok(())
    }

    async fn send_pump_command(
        &self,
        device_id: &str,
        action: PumpAction,
        _params: &PumpParams,
    ) -> Result<(), BackendError> {
        tracing::debug!("backend disabled, dropping pump command {} {}", device_id, action);
        Ok(())
    }
}

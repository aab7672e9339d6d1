use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use plantsync_api::message::PumpParams;
use plantsync_api::models::SensorReport;
use plantsync_api::rules::PumpAction;
use plantsync_server::errors::BackendError;
use plantsync_server::services::{
    BackendClient, ConnectionRegistry, PumpStore, SensorHistory,
};

/// A backend call captured by [`RecordingBackend`].
#[derive(Debug, Clone)]
pub enum BackendCall {
    Sensor(SensorReport),
    Pump {
        device_id: String,
        action: PumpAction,
        params: PumpParams,
    },
}

/// Backend stand-in that records every forwarded call and can be switched
/// into a failing mode.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    fail: AtomicBool,
}

impl RecordingBackend {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pump_actions(&self) -> Vec<PumpAction> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Pump { action, .. } => Some(action),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BackendClient for RecordingBackend {
    async fn ingest_sensor_report(&self, report: &SensorReport) -> Result<(), BackendError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BackendError::Status { status: 502 });
        }
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Sensor(report.clone()));
        Ok(())
    }

    async fn send_pump_command(
        &self,
        device_id: &str,
        action: PumpAction,
        params: &PumpParams,
    ) -> Result<(), BackendError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BackendError::Status { status: 502 });
        }
        self.calls.lock().unwrap().push(BackendCall::Pump {
            device_id: device_id.to_string(),
            action,
            params: *params,
        });
        Ok(())
    }
}

pub struct MockApp {
    pub registry: ConnectionRegistry,
    pub pump: PumpStore,
    pub history: SensorHistory,
    pub backend: Arc<RecordingBackend>,
}

impl MockApp {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::default(),
            pump: PumpStore::default(),
            history: SensorHistory::default(),
            backend: Arc::new(RecordingBackend::default()),
        }
    }

    pub fn backend_client(&self) -> Arc<dyn BackendClient> {
        self.backend.clone()
    }
}

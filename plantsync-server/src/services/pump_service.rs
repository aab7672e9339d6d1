use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use plantsync_api::message::PumpParams;
use plantsync_api::models::PumpState;
use plantsync_api::rules::PumpAction;
use tokio::sync::RwLock;

use crate::services::BackendClient;
use crate::unix_now;

/// In-memory pump state per device MAC address. Nothing is persisted;
/// state disappears with the process, as on the original gateway.
#[derive(Clone, Default)]
pub struct PumpStore {
    states: Arc<RwLock<HashMap<String, PumpState>>>,
}

impl PumpStore {
    /// Current state for a device, default when it has never been seen.
    pub async fn status(&self, mac_address: &str) -> PumpState {
        self.states
            .read()
            .await
            .get(mac_address)
            .cloned()
            .unwrap_or_default()
    }

    /// Apply a mutation under the write lock and return the new state.
    pub async fn update<F>(&self, mac_address: &str, apply: F) -> PumpState
    where
        F: FnOnce(&mut PumpState),
    {
        let mut states = self.states.write().await;
        let state = states.entry(mac_address.to_string()).or_default();
        apply(state);
        state.clone()
    }

    /// Delayed auto-stop for a scheduled run. After `duration` seconds the
    /// pump is stopped only if it is still running *and* the stored duration
    /// still equals the scheduled one — any intervening start/stop cancels
    /// the shutdown by changing that value.
    pub fn schedule_auto_stop(
        &self,
        backend: Arc<dyn BackendClient>,
        mac_address: &str,
        duration: f64,
    ) {
        let store = self.clone();
        let mac_address = mac_address.to_string();

        tracing::info!(
            "scheduling pump {} to stop after {} second(s)",
            mac_address,
            duration
        );

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(duration)).await;

            let current = store.status(&mac_address).await;
            if !current.is_running || current.duration != duration {
                return;
            }

            tracing::info!("pump {} auto-stopped after {} second(s)", mac_address, duration);

            if let Err(e) = backend
                .send_pump_command(&mac_address, PumpAction::Stop, &PumpParams::default())
                .await
            {
                tracing::error!("failed to forward auto-stop for {}: {}", mac_address, e);
            }

            store
                .update(&mac_address, |state| {
                    if let Some(started) = state.start_time {
                        state.total_runtime += (unix_now() - started).max(0.0);
                    }
                    state.is_running = false;
                    state.flow_rate = 0.0;
                    state.duration = 0.0;
                    state.remaining_time = 0.0;
                })
                .await;
        });
    }
}

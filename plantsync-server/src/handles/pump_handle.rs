use std::sync::Arc;

use plantsync_api::message::{PumpCommand, ServerMessage};
use plantsync_api::models::{CommandRecord, PumpState};
use plantsync_api::rules::{
    is_valid_mac, validate_action, validate_params, PumpAction, DEFAULT_FLOW_RATE,
};
use plantsync_api::ResponseStatus;

use crate::errors::PumpError;
use crate::services::{BackendClient, PumpStore};
use crate::unix_now;

/// Process one `pump_control` frame.
pub async fn handle_pump_control(
    store: &PumpStore,
    backend: &Arc<dyn BackendClient>,
    mac_address: &str,
    command: &PumpCommand,
) -> ServerMessage {
    let now = unix_now();

    match apply_command(store, backend, mac_address, command, now).await {
        Ok(state) => ServerMessage::PumpResponse {
            status: ResponseStatus::Success,
            message: format!("pump command {} accepted", command.action),
            error_code: None,
            current_state: Some(state),
            timestamp: now,
        },
        Err(e) => {
            tracing::warn!("pump command {} for {} rejected: {}", command.action, mac_address, e);

            // Only conflict rejections describe the state that caused them;
            // validation failures carry no snapshot.
            let state = match &e {
                PumpError::AlreadyRunning
                | PumpError::AlreadyStopped
                | PumpError::NotRunning => Some(store.status(mac_address).await),
                _ => None,
            };
            ServerMessage::pump_error(e.error_code(), e.to_string(), state, now)
        }
    }
}

/// Reply to a `pump_status_request` with the remaining time recomputed
/// from the start timestamp.
pub async fn handle_pump_status(store: &PumpStore, mac_address: &str) -> ServerMessage {
    let now = unix_now();
    let mut state = store.status(mac_address).await;
    state.remaining_time = state.remaining_at(now).unwrap_or(0.0);

    ServerMessage::PumpStatusResponse {
        status: ResponseStatus::Success,
        device_id: mac_address.to_string(),
        state,
        timestamp: now,
    }
}

async fn apply_command(
    store: &PumpStore,
    backend: &Arc<dyn BackendClient>,
    mac_address: &str,
    command: &PumpCommand,
    now: f64,
) -> Result<PumpState, PumpError> {
    if mac_address.is_empty() {
        return Err(PumpError::MissingDeviceId);
    }
    if !is_valid_mac(mac_address) {
        return Err(PumpError::InvalidMac {
            mac: mac_address.to_string(),
        });
    }

    let action = validate_action(&command.action)?;
    validate_params(action, &command.params)?;

    let current = store.status(mac_address).await;
    match action {
        PumpAction::Start if current.is_running => return Err(PumpError::AlreadyRunning),
        PumpAction::Stop if !current.is_running => return Err(PumpError::AlreadyStopped),
        PumpAction::SetFlow if !current.is_running => return Err(PumpError::NotRunning),
        _ => {}
    }

    // The downstream actuator accepts the command before local state moves.
    backend
        .send_pump_command(mac_address, action, &command.params)
        .await?;

    let record = CommandRecord {
        action: command.action.clone(),
        params: command.params,
        timestamp: now,
    };

    let state = match action {
        PumpAction::Start => {
            let flow_rate = command.params.flow_rate.unwrap_or(DEFAULT_FLOW_RATE);
            let duration = command.params.duration.unwrap_or(0.0);

            let state = store
                .update(mac_address, |state| {
                    state.is_running = true;
                    state.flow_rate = flow_rate;
                    state.start_time = Some(now);
                    state.duration = duration;
                    state.remaining_time = duration;
                    state.push_history(record);
                })
                .await;

            if duration > 0.0 {
                store.schedule_auto_stop(backend.clone(), mac_address, duration);
            }

            state
        }
        PumpAction::Stop => {
            store
                .update(mac_address, |state| {
                    if let Some(started) = state.start_time {
                        state.total_runtime += (now - started).max(0.0);
                    }
                    state.is_running = false;
                    state.flow_rate = 0.0;
                    state.duration = 0.0;
                    state.remaining_time = 0.0;
                    state.push_history(record);
                })
                .await
        }
        PumpAction::SetFlow => {
            // Without an explicit flow_rate the current flow stands; the
            // 50.0 default belongs to start only.
            store
                .update(mac_address, |state| {
                    if let Some(flow_rate) = command.params.flow_rate {
                        state.flow_rate = flow_rate;
                    }
                    state.push_history(record);
                })
                .await
        }
    };

    tracing::info!(
        "pump {} on {} applied, running={} flow={}",
        command.action,
        mac_address,
        state.is_running,
        state.flow_rate
    );

    Ok(state)
}

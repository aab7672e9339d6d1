use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use plantsync_api::message::{DeviceMessage, ServerMessage};
use plantsync_api::{ErrorCode, ResponseStatus};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::handles::{handle_pump_control, handle_pump_status, handle_sensor_data};
use crate::services::{BackendClient, ConnectionRegistry, PumpStore, SensorHistory};
use crate::unix_now;

/// Shared state for device WebSocket connections.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: ConnectionRegistry,
    pub pump: PumpStore,
    pub backend: Arc<dyn BackendClient>,
    pub history: SensorHistory,
}

pub fn websocket_router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    /// Devices usually identify themselves up front; a missing id is
    /// tolerated until the hello frame supplies one.
    #[serde(default)]
    device_id: Option<String>,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state, query.device_id))
}

async fn handle_connection(socket: WebSocket, state: GatewayState, device_id: Option<String>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let mut registered_id = device_id;
    if let Some(id) = &registered_id {
        state.registry.register(id, tx.clone()).await;
    }

    tracing::info!(
        "device connection opened ({})",
        registered_id.as_deref().unwrap_or("unidentified")
    );

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(WsMessage::Text(text)) => {
                let reply = dispatch_frame(&state, &tx, &mut registered_id, &text).await;

                if let Some(reply) = reply {
                    match serde_json::to_string(&reply) {
                        Ok(json) => {
                            if tx.send(WsMessage::Text(json)).is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::error!("failed to encode reply: {}", e),
                    }
                }
            }
            Ok(WsMessage::Close(_)) => {
                break;
            }
            Err(e) => {
                tracing::warn!("device connection error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();

    if let Some(id) = &registered_id {
        state.registry.unregister(id, &tx).await;
        tracing::info!("device {} disconnected", id);
    }
}

/// Decode one text frame and run the matching handler.
///
/// Malformed JSON is logged and dropped; a well-formed frame that cannot be
/// handled gets an error response so the device sees the rejection.
async fn dispatch_frame(
    state: &GatewayState,
    tx: &mpsc::UnboundedSender<WsMessage>,
    registered_id: &mut Option<String>,
    text: &str,
) -> Option<ServerMessage> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("dropping malformed frame: {}", e);
            return None;
        }
    };

    let frame_type = value["type"].as_str().unwrap_or("").to_string();

    match serde_json::from_value::<DeviceMessage>(value) {
        Ok(DeviceMessage::Hello(hello)) => {
            if let Some(id) = &hello.device_info.device_id {
                if registered_id.as_deref() != Some(id) {
                    if let Some(previous) = registered_id.take() {
                        state.registry.unregister(&previous, tx).await;
                    }
                    state.registry.register(id, tx.clone()).await;
                    *registered_id = Some(id.clone());
                }
            }

            Some(ServerMessage::HelloAck {
                transport: hello.transport.unwrap_or_else(|| String::from("websocket")),
                timestamp: unix_now(),
            })
        }
        Ok(DeviceMessage::SensorData {
            timestamp,
            device_info,
            sensor_values,
        }) => Some(
            handle_sensor_data(
                &state.history,
                &state.backend,
                timestamp,
                &device_info,
                &sensor_values,
            )
            .await,
        ),
        Ok(DeviceMessage::PumpControl {
            mac_address,
            command,
            ..
        }) => Some(handle_pump_control(&state.pump, &state.backend, &mac_address, &command).await),
        Ok(DeviceMessage::PumpStatusRequest { mac_address, .. }) => {
            Some(handle_pump_status(&state.pump, &mac_address).await)
        }
        Err(e) => {
            let known = matches!(
                frame_type.as_str(),
                "hello" | "sensor_data" | "pump_control" | "pump_status_request"
            );

            let (code, message) = if known {
                (
                    ErrorCode::ProcessingError,
                    format!("malformed {frame_type} frame: {e}"),
                )
            } else {
                (
                    ErrorCode::UnknownMessageType,
                    format!("unknown message type: {frame_type}"),
                )
            };

            tracing::warn!("{}", message);
            Some(ServerMessage::PumpResponse {
                status: ResponseStatus::Error,
                message,
                error_code: Some(code),
                current_state: None,
                timestamp: unix_now(),
            })
        }
    }
}

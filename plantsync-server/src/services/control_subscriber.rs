use std::time::Duration;

use futures::StreamExt;
use plantsync_api::message::ControlCommand;

use crate::configs::Redis;
use crate::errors::RelayError;
use crate::services::ConnectionRegistry;
use crate::unix_now;

/// Turns backend control payloads into WebSocket frames for the addressed
/// device. Split out of the subscriber so the translation path is testable
/// without a broker.
#[derive(Clone)]
pub struct ControlRelay {
    registry: ConnectionRegistry,
}

impl ControlRelay {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Decode one channel payload and deliver it. Returns `true` when the
    /// frame reached a connected device.
    pub async fn deliver(&self, payload: &str) -> Result<bool, RelayError> {
        let command: ControlCommand = serde_json::from_str(payload)?;

        let Some((device_id, frame)) = command.into_device_message(unix_now()) else {
            tracing::warn!("control command missing deviceId/actuatorCode/action, dropping");
            return Ok(false);
        };

        let text = serde_json::to_string(&frame)?;

        if self.registry.send_to_device(&device_id, text).await {
            tracing::info!("control command forwarded to device {}", device_id);
            Ok(true)
        } else {
            tracing::warn!("device {} is offline, control command dropped", device_id);
            Ok(false)
        }
    }
}

/// Redis pub/sub listener for backend-issued device control commands.
///
/// One channel, no acknowledgement and no replay: a failed or undeliverable
/// message is logged and dropped. Errors tear the subscription down and the
/// loop reconnects after a fixed pause.
pub struct ControlSubscriber {
    config: Redis,
    relay: ControlRelay,
}

impl ControlSubscriber {
    pub fn new(config: Redis, registry: ConnectionRegistry) -> Self {
        Self {
            config,
            relay: ControlRelay::new(registry),
        }
    }

    pub async fn run(self) {
        loop {
            if let Err(e) = self.listen().await {
                tracing::error!("device control subscriber error: {}", e);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    async fn listen(&self) -> Result<(), RelayError> {
        let client = redis::Client::open(self.config.url.as_str())?;
        let connection = client.get_async_connection().await?;
        let mut pubsub = connection.into_pubsub();

        pubsub.subscribe(&self.config.channel).await?;
        tracing::info!("subscribed to device control channel: {}", self.config.channel);

        let mut stream = pubsub.on_message();
        while let Some(message) = stream.next().await {
            let payload: String = message.get_payload()?;
            tracing::debug!("control payload received: {}", payload);

            if let Err(e) = self.relay.deliver(&payload).await {
                tracing::error!("failed to process control command: {}", e);
            }
        }

        Err(RelayError::StreamClosed)
    }
}

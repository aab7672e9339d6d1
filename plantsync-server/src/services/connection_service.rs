use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message as WsMessage;
use tokio::sync::{RwLock, mpsc};

/// Registry of live device connections, keyed by device id (MAC address).
///
/// A device reconnecting under the same id replaces the previous entry:
/// last write wins, the stale sender is dropped.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<WsMessage>>>>,
}

impl ConnectionRegistry {
    pub async fn register(&self, device_id: &str, tx: mpsc::UnboundedSender<WsMessage>) {
        let mut connections = self.connections.write().await;
        if connections.insert(device_id.to_string(), tx).is_some() {
            tracing::info!("device {} reconnected, replacing stale connection", device_id);
        }
    }

    /// Remove the entry for `device_id`, but only when it still belongs to
    /// the departing connection.
    pub async fn unregister(&self, device_id: &str, tx: &mpsc::UnboundedSender<WsMessage>) {
        let mut connections = self.connections.write().await;
        if let Some(current) = connections.get(device_id) {
            if current.same_channel(tx) {
                connections.remove(device_id);
            }
        }
    }

    /// Best-effort delivery of a serialized frame. Returns `false` when the
    /// device is not connected or its channel is gone.
    pub async fn send_to_device(&self, device_id: &str, text: String) -> bool {
        let tx = {
            let connections = self.connections.read().await;
            connections.get(device_id).cloned()
        };

        match tx {
            Some(tx) => tx.send(WsMessage::Text(text)).is_ok(),
            None => false,
        }
    }

    pub async fn is_online(&self, device_id: &str) -> bool {
        self.connections.read().await.contains_key(device_id)
    }

    pub async fn online_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_registration_wins() {
        let registry = ConnectionRegistry::default();
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        registry.register("AA:BB:CC:DD:EE:FF", old_tx).await;
        registry.register("AA:BB:CC:DD:EE:FF", new_tx).await;

        assert!(registry.send_to_device("AA:BB:CC:DD:EE:FF", "ping".into()).await);
        assert!(new_rx.try_recv().is_ok());
        assert!(old_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_ignores_superseded_connections() {
        let registry = ConnectionRegistry::default();
        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        let (new_tx, _new_rx) = mpsc::unbounded_channel();

        registry.register("AA:BB:CC:DD:EE:FF", old_tx.clone()).await;
        registry.register("AA:BB:CC:DD:EE:FF", new_tx).await;

        // The old connection going away must not evict the new one.
        registry.unregister("AA:BB:CC:DD:EE:FF", &old_tx).await;
        assert!(registry.is_online("AA:BB:CC:DD:EE:FF").await);
    }

    #[tokio::test]
    async fn offline_device_is_reported() {
        let registry = ConnectionRegistry::default();
        assert!(!registry.send_to_device("AA:BB:CC:DD:EE:FF", "ping".into()).await);
    }
}

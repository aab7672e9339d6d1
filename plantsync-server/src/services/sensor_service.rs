use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use plantsync_api::message::ValidatedValue;
use tokio::sync::RwLock;

/// Readings kept per device before the oldest is dropped.
pub const SENSOR_HISTORY_LIMIT: usize = 100;

/// One validated telemetry frame.
#[derive(Debug, Clone)]
pub struct SensorSnapshot {
    pub timestamp: f64,
    pub values: BTreeMap<String, ValidatedValue>,
}

/// Recent validated readings per device MAC address, in arrival order.
#[derive(Clone, Default)]
pub struct SensorHistory {
    entries: Arc<RwLock<HashMap<String, VecDeque<SensorSnapshot>>>>,
}

impl SensorHistory {
    pub async fn record(&self, device_id: &str, snapshot: SensorSnapshot) {
        let mut entries = self.entries.write().await;
        let log = entries.entry(device_id.to_string()).or_default();

        log.push_back(snapshot);
        while log.len() > SENSOR_HISTORY_LIMIT {
            log.pop_front();
        }
    }

    pub async fn latest(&self, device_id: &str) -> Option<SensorSnapshot> {
        self.entries
            .read()
            .await
            .get(device_id)
            .and_then(|log| log.back().cloned())
    }

    /// Most recent snapshot for every device that has reported.
    pub async fn latest_all(&self) -> BTreeMap<String, SensorSnapshot> {
        self.entries
            .read()
            .await
            .iter()
            .filter_map(|(id, log)| log.back().map(|s| (id.clone(), s.clone())))
            .collect()
    }

    pub async fn count(&self, device_id: &str) -> usize {
        self.entries
            .read()
            .await
            .get(device_id)
            .map_or(0, VecDeque::len)
    }
}

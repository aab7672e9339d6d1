use std::sync::Arc;

use plantsync_server::services::{BackendClient, DisabledBackend, HttpBackendClient};

use crate::generator::MockFleet;
use crate::settings::Settings;

pub mod generator;
pub mod settings;

pub async fn run(settings: &Arc<Settings>) {
    let backend: Arc<dyn BackendClient> = match &settings.backend {
        Some(config) => Arc::new(HttpBackendClient::new(config)),
        None => Arc::new(DisabledBackend),
    };

    let fleet = MockFleet::new(backend);

    for i in 0..settings.mock.device_count {
        match fleet.create_device(None, Some(format!("mock-device-{i}"))).await {
            Ok(mac) => {
                if settings.mock.backfill_hours > 0 {
                    match fleet
                        .backfill(
                            &mac,
                            settings.mock.backfill_hours,
                            settings.mock.backfill_interval_minutes,
                        )
                        .await
                    {
                        Ok(sent) => tracing::info!("backfilled {} reading(s) for {}", sent, mac),
                        Err(e) => tracing::error!("backfill for {} failed: {}", mac, e),
                    }
                }

                fleet
                    .start_auto_generation(&mac, settings.mock.interval_secs)
                    .await;
            }
            Err(e) => tracing::error!("failed to create mock device: {}", e),
        }
    }

    tracing::info!(
        "mock fleet running with {} device(s)",
        fleet.list_devices().await.len()
    );

    std::future::pending::<()>().await;
}

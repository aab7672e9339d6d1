use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::{
    AdvisoryService, BackendClient, ConnectionRegistry, ControlSubscriber, DisabledBackend,
    GatewayState, HttpBackendClient, PumpStore, SensorHistory, websocket_router,
};

pub async fn create_app(settings: &Arc<Settings>) -> Router {
    let registry = ConnectionRegistry::default();
    let pump = PumpStore::default();
    let history = SensorHistory::default();

    let backend: Arc<dyn BackendClient> = match &settings.backend {
        Some(config) => Arc::new(HttpBackendClient::new(config)),
        None => Arc::new(DisabledBackend),
    };

    let advisory = settings
        .advisory
        .as_ref()
        .map(|config| Arc::new(AdvisoryService::new(config)));

    if let Some(redis) = settings.redis.clone() {
        let subscriber = ControlSubscriber::new(redis, registry.clone());
        tokio::spawn(subscriber.run());
    }

    let gateway = websocket_router(GatewayState {
        registry,
        pump,
        backend,
        history: history.clone(),
    });

    let advisory_routes = Router::new()
        .route("/sensor-data", get(latest_sensor_data).post(analyze_sensor_data))
        .with_state(AdvisoryState { advisory, history });

    Router::new()
        .route("/", get(usage))
        .merge(gateway)
        .nest("/api", advisory_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Service banner with the available endpoints.
async fn usage() -> Json<serde_json::Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "ws": "device gateway (websocket, ?device_id=<mac>)",
            "api/sensor-data": "GET latest readings, POST care analysis",
        },
    }))
}

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AdvisoryError, ApiError};
use crate::services::{AdvisoryService, CareReport, PlantInfo, SensorHistory};

#[derive(Clone)]
pub struct AdvisoryState {
    /// `None` when no advisory endpoint is configured.
    pub advisory: Option<Arc<AdvisoryService>>,
    pub history: SensorHistory,
}

#[derive(Debug, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default)]
    pub sensor_data: BTreeMap<String, f64>,
    #[serde(default)]
    pub plant_info: Option<PlantInfo>,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Run a care analysis over the submitted readings.
pub async fn analyze_sensor_data(
    State(state): State<AdvisoryState>,
    Json(request): Json<AdvisoryRequest>,
) -> Result<Json<CareReport>, ApiError> {
    let advisory = state
        .advisory
        .as_ref()
        .ok_or(AdvisoryError::Disabled)?;

    if request.sensor_data.is_empty() {
        return Err(AdvisoryError::MissingSensorData.into());
    }

    let report = advisory
        .process(request.sensor_data, request.plant_info)
        .await?;

    Ok(Json(report))
}

/// Latest validated readings, for one device or for all of them.
pub async fn latest_sensor_data(
    State(state): State<AdvisoryState>,
    Query(query): Query<LatestQuery>,
) -> Json<Value> {
    match query.device_id {
        Some(device_id) => {
            let snapshot = state.history.latest(&device_id).await;
            Json(json!({
                "device_id": device_id,
                "timestamp": snapshot.as_ref().map(|s| s.timestamp),
                "sensor_data": snapshot.map(|s| s.values),
            }))
        }
        None => {
            let devices: serde_json::Map<String, Value> = state
                .history
                .latest_all()
                .await
                .into_iter()
                .map(|(id, snapshot)| {
                    (
                        id,
                        json!({
                            "timestamp": snapshot.timestamp,
                            "sensor_data": snapshot.values,
                        }),
                    )
                })
                .collect();

            Json(json!({ "devices": devices }))
        }
    }
}

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use plantsync_server::app::create_app;
use plantsync_server::configs::{Logger, Server, Settings};

fn test_settings() -> Arc<Settings> {
    Arc::new(Settings {
        server: Server {
            host: String::from("127.0.0.1"),
            port: 8000,
        },
        logger: Logger {
            level: String::from("debug"),
        },
        redis: None,
        backend: None,
        advisory: None,
    })
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn usage_banner_lists_the_endpoints() {
    let app = create_app(&test_settings()).await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["service"], "plantsync_server");
    assert!(body["endpoints"].get("ws").is_some());
}

#[tokio::test]
async fn analysis_without_an_advisory_endpoint_is_unavailable() {
    let app = create_app(&test_settings()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sensor-data")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"sensor_data": {"temperature": 23.0}}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], 503);
}

#[tokio::test]
async fn latest_readings_start_empty() {
    let app = create_app(&test_settings()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sensor-data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["devices"], json!({}));
}

#[tokio::test]
async fn unknown_device_query_returns_nulls() {
    let app = create_app(&test_settings()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sensor-data?device_id=AA:BB:CC:DD:EE:FF")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["device_id"], "AA:BB:CC:DD:EE:FF");
    assert!(body["sensor_data"].is_null());
}

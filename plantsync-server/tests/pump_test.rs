use std::time::Duration;

use plantsync_api::message::{PumpCommand, PumpParams, ServerMessage};
use plantsync_api::rules::{PumpAction, DEFAULT_FLOW_RATE};
use plantsync_api::{ErrorCode, ResponseStatus};
use plantsync_server::handles::{handle_pump_control, handle_pump_status};

use crate::common::mock_app::MockApp;

mod common;

const MAC: &str = "AA:BB:CC:DD:EE:FF";

fn command(action: &str, flow_rate: Option<f64>, duration: Option<f64>) -> PumpCommand {
    PumpCommand {
        action: action.to_string(),
        params: PumpParams {
            flow_rate,
            duration,
        },
    }
}

fn expect_error(response: ServerMessage) -> (ErrorCode, String) {
    match response {
        ServerMessage::PumpResponse {
            status: ResponseStatus::Error,
            message,
            error_code: Some(code),
            ..
        } => (code, message),
        other => panic!("expected an error response, got {other:?}"),
    }
}

#[tokio::test]
async fn start_applies_defaults_and_records_history() {
    let app = MockApp::new();
    let backend = app.backend_client();

    let response = handle_pump_control(&app.pump, &backend, MAC, &command("start", None, None)).await;

    let state = match response {
        ServerMessage::PumpResponse {
            status: ResponseStatus::Success,
            current_state: Some(state),
            ..
        } => state,
        other => panic!("expected success, got {other:?}"),
    };

    assert!(state.is_running);
    assert_eq!(state.flow_rate, DEFAULT_FLOW_RATE);
    assert_eq!(state.duration, 0.0);
    assert_eq!(state.command_history.len(), 1);
    assert_eq!(state.command_history[0].action, "start");
    assert_eq!(app.backend.pump_actions(), vec![PumpAction::Start]);
}

#[tokio::test]
async fn duplicate_start_is_rejected() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", Some(30.0), None)).await;
    let response =
        handle_pump_control(&app.pump, &backend, MAC, &command("start", Some(60.0), None)).await;

    let (code, _) = expect_error(response);
    assert_eq!(code, ErrorCode::PumpAlreadyRunning);

    // The rejected command is neither applied nor forwarded.
    let state = app.pump.status(MAC).await;
    assert_eq!(state.flow_rate, 30.0);
    assert_eq!(app.backend.pump_actions(), vec![PumpAction::Start]);
}

#[tokio::test]
async fn stop_requires_a_running_pump() {
    let app = MockApp::new();
    let backend = app.backend_client();

    let response = handle_pump_control(&app.pump, &backend, MAC, &command("stop", None, None)).await;

    let (code, _) = expect_error(response);
    assert_eq!(code, ErrorCode::PumpAlreadyStopped);
    assert!(app.backend.calls().is_empty());
}

#[tokio::test]
async fn set_flow_requires_a_running_pump() {
    let app = MockApp::new();
    let backend = app.backend_client();

    let response =
        handle_pump_control(&app.pump, &backend, MAC, &command("set_flow", Some(20.0), None)).await;

    let (code, _) = expect_error(response);
    assert_eq!(code, ErrorCode::PumpNotRunning);
}

#[tokio::test]
async fn set_flow_without_a_rate_keeps_the_current_flow() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", Some(30.0), None)).await;
    let response =
        handle_pump_control(&app.pump, &backend, MAC, &command("set_flow", None, None)).await;

    let state = match response {
        ServerMessage::PumpResponse {
            status: ResponseStatus::Success,
            current_state: Some(state),
            ..
        } => state,
        other => panic!("expected success, got {other:?}"),
    };

    assert_eq!(state.flow_rate, 30.0);
    assert_eq!(state.command_history[0].action, "set_flow");
}

#[tokio::test]
async fn only_conflict_rejections_carry_a_state_snapshot() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", None, None)).await;

    let response =
        handle_pump_control(&app.pump, &backend, MAC, &command("reverse", None, None)).await;
    match response {
        ServerMessage::PumpResponse {
            error_code: Some(ErrorCode::InvalidCommand),
            current_state: None,
            ..
        } => {}
        other => panic!("expected a bare validation rejection, got {other:?}"),
    }

    let response =
        handle_pump_control(&app.pump, &backend, MAC, &command("start", None, None)).await;
    match response {
        ServerMessage::PumpResponse {
            error_code: Some(ErrorCode::PumpAlreadyRunning),
            current_state: Some(state),
            ..
        } => assert!(state.is_running),
        other => panic!("expected a conflict rejection with state, got {other:?}"),
    }
}

#[tokio::test]
async fn lifecycle_keeps_history_newest_first() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", Some(40.0), None)).await;
    handle_pump_control(&app.pump, &backend, MAC, &command("set_flow", Some(75.0), None)).await;
    let response = handle_pump_control(&app.pump, &backend, MAC, &command("stop", None, None)).await;

    let state = match response {
        ServerMessage::PumpResponse {
            current_state: Some(state),
            ..
        } => state,
        other => panic!("expected a pump response, got {other:?}"),
    };

    assert!(!state.is_running);
    assert_eq!(state.flow_rate, 0.0);
    let actions: Vec<&str> = state
        .command_history
        .iter()
        .map(|r| r.action.as_str())
        .collect();
    assert_eq!(actions, vec!["stop", "set_flow", "start"]);
    assert_eq!(
        app.backend.pump_actions(),
        vec![PumpAction::Start, PumpAction::SetFlow, PumpAction::Stop]
    );
}

#[tokio::test]
async fn unsupported_command_and_bad_params_are_rejected() {
    let app = MockApp::new();
    let backend = app.backend_client();

    let (code, _) =
        expect_error(handle_pump_control(&app.pump, &backend, MAC, &command("reverse", None, None)).await);
    assert_eq!(code, ErrorCode::InvalidCommand);

    let (code, _) = expect_error(
        handle_pump_control(&app.pump, &backend, MAC, &command("start", Some(120.0), None)).await,
    );
    assert_eq!(code, ErrorCode::InvalidParams);

    let (code, _) = expect_error(
        handle_pump_control(&app.pump, &backend, MAC, &command("start", None, Some(7200.0))).await,
    );
    assert_eq!(code, ErrorCode::InvalidParams);
}

#[tokio::test]
async fn missing_or_malformed_mac_is_rejected() {
    let app = MockApp::new();
    let backend = app.backend_client();

    let (code, _) =
        expect_error(handle_pump_control(&app.pump, &backend, "", &command("start", None, None)).await);
    assert_eq!(code, ErrorCode::MissingDeviceId);

    let (code, _) = expect_error(
        handle_pump_control(&app.pump, &backend, "not-a-mac", &command("start", None, None)).await,
    );
    assert_eq!(code, ErrorCode::MissingDeviceId);
}

#[tokio::test]
async fn backend_failure_leaves_state_untouched() {
    let app = MockApp::new();
    let backend = app.backend_client();
    app.backend.set_fail(true);

    let response = handle_pump_control(&app.pump, &backend, MAC, &command("start", None, None)).await;

    let (code, _) = expect_error(response);
    assert_eq!(code, ErrorCode::ApiError);
    assert!(!app.pump.status(MAC).await.is_running);
}

#[tokio::test]
async fn status_of_an_unknown_device_is_the_default() {
    let app = MockApp::new();

    let response = handle_pump_status(&app.pump, MAC).await;

    match response {
        ServerMessage::PumpStatusResponse {
            status: ResponseStatus::Success,
            device_id,
            state,
            ..
        } => {
            assert_eq!(device_id, MAC);
            assert!(!state.is_running);
            assert!(state.command_history.is_empty());
        }
        other => panic!("expected a status response, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn scheduled_run_stops_itself() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", None, Some(2.0))).await;
    assert!(app.pump.status(MAC).await.is_running);

    tokio::time::sleep(Duration::from_secs(3)).await;

    let state = app.pump.status(MAC).await;
    assert!(!state.is_running);
    assert_eq!(state.remaining_time, 0.0);
    assert_eq!(
        app.backend.pump_actions(),
        vec![PumpAction::Start, PumpAction::Stop]
    );
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_a_stale_auto_stop() {
    let app = MockApp::new();
    let backend = app.backend_client();

    handle_pump_control(&app.pump, &backend, MAC, &command("start", None, Some(2.0))).await;
    handle_pump_control(&app.pump, &backend, MAC, &command("stop", None, None)).await;
    handle_pump_control(&app.pump, &backend, MAC, &command("start", None, None)).await;

    tokio::time::sleep(Duration::from_secs(5)).await;

    // The stale timer sees a different duration and leaves the new run alone.
    assert!(app.pump.status(MAC).await.is_running);
    assert_eq!(
        app.backend.pump_actions(),
        vec![PumpAction::Start, PumpAction::Stop, PumpAction::Start]
    );
}

//! Device client tests against simulated devices

use std::time::Duration;

use axum::http::StatusCode;

use recuair::device::client::{DeviceApi, DeviceClient, Options};
use recuair::device::command::CommandRequest;
use recuair::device::status::Status;
use recuair::errors::{ErrorKind, RecuairError};

use crate::support::{closed_host, fields, holly, MockDeviceBuilder};

fn client() -> DeviceClient {
    DeviceClient::new(Options {
        status_timeout: Duration::from_millis(500),
        command_timeout: Duration::from_millis(500),
    })
    .unwrap()
}

fn answer() -> CommandRequest {
    CommandRequest::new("unused", [("answer", "42")])
}

fn answer_to(host: &str) -> CommandRequest {
    CommandRequest {
        device: host.to_string(),
        ..answer()
    }
}

#[tokio::test]
async fn test_get_status() {
    let device = MockDeviceBuilder::new().start().await;

    let status = client().fetch_status(&device.host).await.unwrap();

    assert_eq!(status, holly(&device.host));
}

#[tokio::test]
async fn test_get_status_off() {
    let device = MockDeviceBuilder::new().page("response-off.html").start().await;

    let status = client().fetch_status(&device.host).await.unwrap();

    assert_eq!(
        status,
        Status {
            temperature_in: None,
            humidity_in: None,
            temperature_out: None,
            co2_ppm: None,
            ..holly(&device.host)
        }
    );
}

#[tokio::test]
async fn test_get_status_warning() {
    let device = MockDeviceBuilder::new().page("warning.html").start().await;

    let status = client().fetch_status(&device.host).await.unwrap();

    assert_eq!(
        status,
        Status {
            temperature_in: None,
            humidity_in: None,
            temperature_out: None,
            mode: "Off".to_string(),
            co2_ppm: None,
            filter: 100,
            fan: 0,
            light: 0,
            warnings: vec!["N3: Filtry - KONEC životnosti, prosím vyměňte filtry".to_string()],
            ..holly(&device.host)
        }
    );
}

#[tokio::test]
async fn test_get_status_invalid() {
    let device = MockDeviceBuilder::new().page("invalid.html").start().await;

    let error = client().fetch_status(&device.host).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    assert_eq!(
        error.to_string(),
        format!("Invalid response returned from device {}", device.host)
    );
}

#[tokio::test]
async fn test_get_status_connection_error() {
    let host = closed_host().await;

    let error = client().fetch_status(&host).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    let message = error.to_string();
    assert!(
        message.starts_with(&format!("Error fetching status of device {}: ", host)),
        "{}",
        message
    );
    assert!(message.contains("error sending request"), "{}", message);
}

#[tokio::test]
async fn test_get_status_server_error() {
    let device = MockDeviceBuilder::new()
        .page_status(StatusCode::INTERNAL_SERVER_ERROR)
        .start()
        .await;

    let error = client().fetch_status(&device.host).await.unwrap_err();

    assert!(matches!(error, RecuairError::Fetch { .. }));
    assert!(error.to_string().contains("500"), "{}", error);
}

#[tokio::test]
async fn test_get_status_redirect() {
    let device = MockDeviceBuilder::new()
        .page_status(StatusCode::FOUND)
        .start()
        .await;

    let error = client().fetch_status(&device.host).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    let message = error.to_string();
    assert!(
        message.starts_with(&format!("Error fetching status of device {}: ", device.host)),
        "{}",
        message
    );
    assert!(message.contains("302"), "{}", message);
}

#[tokio::test]
async fn test_get_status_timeout() {
    let device = MockDeviceBuilder::new()
        .page_delay(Duration::from_secs(5))
        .start()
        .await;

    let error = client().fetch_status(&device.host).await.unwrap_err();

    assert!(matches!(error, RecuairError::Fetch { .. }));
}

#[tokio::test]
async fn test_get_status_invalid_host() {
    let error = client().fetch_status("bad host").await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(error.to_string().starts_with("Error fetching status of device bad host: "));
}

#[tokio::test]
async fn test_post_request() {
    let device = MockDeviceBuilder::new().start().await;

    client().send_command(&answer_to(&device.host)).await.unwrap();

    assert_eq!(device.received(), vec![fields(&[("answer", "42")])]);
}

#[tokio::test]
async fn test_post_request_fw_12() {
    let device = MockDeviceBuilder::new()
        .command_status(StatusCode::MOVED_PERMANENTLY)
        .start()
        .await;

    client().send_command(&answer_to(&device.host)).await.unwrap();

    assert_eq!(device.received().len(), 1);
}

#[tokio::test]
async fn test_post_request_invalid() {
    let device = MockDeviceBuilder::new()
        .command_status(StatusCode::OK)
        .start()
        .await;

    let error = client()
        .send_command(&answer_to(&device.host))
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        format!("Unknown error from device {}, status code 200", device.host)
    );
}

#[tokio::test]
async fn test_post_request_unexpected_status() {
    let device = MockDeviceBuilder::new()
        .command_status(StatusCode::BAD_GATEWAY)
        .start()
        .await;

    let error = client()
        .send_command(&answer_to(&device.host))
        .await
        .unwrap_err();

    assert!(matches!(error, RecuairError::UnknownStatus { code: 502, .. }));
}

#[tokio::test]
async fn test_post_request_error() {
    let host = closed_host().await;

    let error = client().send_command(&answer_to(&host)).await.unwrap_err();

    assert!(
        error.to_string().starts_with(&format!("Error from device {}: ", host)),
        "{}",
        error
    );
}

#[tokio::test]
async fn test_light_off_body() {
    let device = MockDeviceBuilder::new().start().await;
    let request = recuair::dispatch::command::Command::light_off()
        .request(&device.host)
        .unwrap();

    client().send_command(&request).await.unwrap();

    assert_eq!(
        device.received(),
        vec![fields(&[("r", "0"), ("g", "0"), ("b", "0"), ("intensity", "0")])]
    );
}

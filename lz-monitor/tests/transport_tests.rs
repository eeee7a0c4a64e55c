//! Transport and wire shape tests

use std::sync::Arc;

use lz_monitor::raw::{ErrorLike, ErrorTarget, HttpRequest};
use lz_monitor::{ChannelTransport, DeviceInfo, Monitor, MonitorOptions, NullTransport, RawEvent, Transport};
use serde_json::json;

fn options() -> MonitorOptions {
    MonitorOptions::builder()
        .dsn("https://collector.example.com/report")
        .api_key("project-key")
        .user_id("u-42")
        .page_url("https://shop.example.com/cart")
        .build()
}

#[tokio::test]
async fn test_channel_transport_delivers_reports() {
    let (transport, mut receiver) = ChannelTransport::new();
    assert_eq!(transport.name(), "channel");
    let monitor = Monitor::init(options(), Arc::new(transport)).unwrap();

    monitor.dispatch(RawEvent::Fetch(HttpRequest::new("GET", "https://api.example.com/items", 500)));

    let report = receiver.recv().await.unwrap();
    assert_eq!(report.uuid, monitor.uuid());
    assert_eq!(report.record.http().unwrap().http_status, 500);
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_channel_transport_survives_closed_receiver() {
    let (transport, receiver) = ChannelTransport::new();
    drop(receiver);
    let monitor = Monitor::init(options(), Arc::new(transport)).unwrap();

    let outcome = monitor.dispatch(RawEvent::Error(ErrorTarget::from_error(ErrorLike::new(
        "boom",
        "Error\n    at f (app.js:2:7)",
    ))));

    assert!(outcome.reported);
    assert_eq!(monitor.stats().handler_failures, 0);
}

#[test]
fn test_null_transport_accepts_everything() {
    let monitor = Monitor::init(options(), Arc::new(NullTransport)).unwrap();

    let outcome = monitor.dispatch(RawEvent::Fetch(HttpRequest::new("GET", "https://api.example.com/x", 404)));

    assert!(outcome.reported);
    assert_eq!(monitor.reporter().transport_name(), "null");
}

#[test]
fn test_report_wire_shape() {
    let transport = lz_monitor::MemoryTransport::new();
    let device = DeviceInfo::from_user_agent(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    );
    let monitor = Monitor::with_device(options(), device, Arc::new(transport.clone())).unwrap();
    assert_eq!(monitor.reporter().device_info().browser, "Chrome");

    monitor.dispatch(RawEvent::Error(ErrorTarget::from_error(ErrorLike::new(
        "boom",
        "Error\n    at f (https://shop.example.com/app.js:2:7)",
    ))));

    let report = transport.reports().remove(0);
    let wire = serde_json::to_value(&report).unwrap();

    assert_eq!(wire["apiKey"], json!("project-key"));
    assert_eq!(wire["userId"], json!("u-42"));
    assert_eq!(wire["pageUrl"], json!("https://shop.example.com/cart"));
    assert_eq!(wire["sdkVersion"], json!(lz_monitor::SDK_VERSION));
    assert_eq!(wire["type"], json!("error"));
    assert_eq!(wire["status"], json!("error"));
    assert_eq!(wire["message"], json!("boom"));
    assert_eq!(wire["fileName"], json!("https://shop.example.com/app.js"));
    assert_eq!(wire["line"], json!(2));
    assert_eq!(wire["column"], json!(7));
    assert!(wire["time"].is_i64());
    assert_eq!(wire["deviceInfo"]["browser"], json!("Chrome"));
    assert_eq!(wire["deviceInfo"]["os"], json!("Windows"));

    let crumb = &wire["breadcrumb"][0];
    assert_eq!(crumb["type"], json!("error"));
    assert_eq!(crumb["category"], json!("code_error"));
    assert_eq!(crumb["data"]["message"], json!("boom"));
}

#[test]
fn test_user_id_omitted_when_unset() {
    let transport = lz_monitor::MemoryTransport::new();
    let options = MonitorOptions::builder()
        .dsn("https://collector.example.com/report")
        .api_key("project-key")
        .build();
    let monitor = Monitor::init(options, Arc::new(transport.clone())).unwrap();

    monitor.dispatch(RawEvent::Xhr(HttpRequest::new("GET", "https://api.example.com/x", 500)));

    let wire = serde_json::to_value(&transport.drain()[0]).unwrap();
    assert!(wire.get("userId").is_none());
    assert_eq!(transport.report_count(), 0);
}

//! Option binding tests

use lz_monitor::{EventType, MonitorError, MonitorOptions};
use serde_json::json;

#[test]
fn test_defaults() {
    let options = MonitorOptions::default();

    assert_eq!(options.max_breadcrumbs, 20);
    assert!(!options.repeat_code_error);
    assert!(!options.disabled);
    assert!(options.switches.is_enabled(&EventType::Click));
    assert!(options.validate_required().is_err());
}

#[test]
fn test_bind_json_accepts_known_keys() {
    let mut builder = MonitorOptions::builder();
    let rejected = builder.bind_json(&json!({
        "dsn": "https://collector.example.com",
        "apiKey": "k",
        "userId": "u-1",
        "maxBreadcrumbs": 50,
        "repeatCodeError": true,
        "throttleDelayTime": 100,
        "enableClick": false,
        "filterXhrUrlRegExp": "sockjs",
    }));
    assert!(rejected.is_empty());

    let options = builder.build();
    assert_eq!(options.dsn, "https://collector.example.com");
    assert_eq!(options.api_key, "k");
    assert_eq!(options.user_id.as_deref(), Some("u-1"));
    assert_eq!(options.max_breadcrumbs, 50);
    assert!(options.repeat_code_error);
    assert_eq!(options.throttle_delay_time, 100);
    assert!(!options.switches.is_enabled(&EventType::Click));
    assert!(options.is_filtered_url("https://a.com/sockjs/info"));
    assert!(options.validate_required().is_ok());
}

#[test]
fn test_wrong_type_keeps_previous_value() {
    let mut builder = MonitorOptions::builder().max_breadcrumbs(30).repeat_code_error(true);

    let rejected = builder.bind_json(&json!({
        "maxBreadcrumbs": "lots",
        "repeatCodeError": "yes",
        "dsn": "https://collector.example.com",
    }));

    assert_eq!(rejected.len(), 2);
    assert!(rejected.iter().all(|e| matches!(e, MonitorError::InvalidOption { .. })));

    let options = builder.build();
    assert_eq!(options.max_breadcrumbs, 30);
    assert!(options.repeat_code_error);
    assert_eq!(options.dsn, "https://collector.example.com");
}

#[test]
fn test_callable_options_rejected_from_json() {
    let mut builder = MonitorOptions::builder();

    let rejected = builder.bind_json(&json!({"beforePushBreadcrumb": "function () {}"}));

    assert_eq!(rejected.len(), 1);
    assert!(builder.build().before_push_breadcrumb.is_none());
}

#[test]
fn test_bad_regex_rejected() {
    let mut builder = MonitorOptions::builder();

    let rejected = builder.bind_json(&json!({"filterXhrUrlRegExp": "(unclosed"}));

    assert_eq!(rejected.len(), 1);
    assert!(builder.build().filter_xhr_url.is_none());
}

#[test]
fn test_non_object_rejected() {
    let mut builder = MonitorOptions::builder();
    assert_eq!(builder.bind_json(&json!([1, 2])).len(), 1);
}

#[test]
fn test_unknown_keys_ignored() {
    let options = MonitorOptions::builder()
        .with_json(&json!({"overTime": 10, "apiKey": "k"}))
        .build();
    assert_eq!(options.api_key, "k");
}

#[test]
fn test_zero_capacity_falls_back_to_default() {
    let options = MonitorOptions::builder().max_breadcrumbs(0).build();
    assert_eq!(options.max_breadcrumbs, 20);
}

#[test]
fn test_collector_url_match() {
    let options = MonitorOptions::builder().dsn("collector.example.com/report").build();

    assert!(options.is_collector_url("https://collector.example.com/report?x=1"));
    assert!(!options.is_collector_url("https://api.example.com/report"));
    assert!(!MonitorOptions::default().is_collector_url("https://anything"));
}

#[test]
fn test_switches_from_serde() {
    let switches: lz_monitor::EventSwitches = serde_json::from_value(json!({"fetch": false})).unwrap();

    assert!(!switches.is_enabled(&EventType::Fetch));
    assert!(switches.is_enabled(&EventType::Xhr));
    assert!(switches.is_enabled(&EventType::Other("vue".to_string())));
}

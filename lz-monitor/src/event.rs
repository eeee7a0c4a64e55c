//! Event taxonomy and canonical record shapes

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Raw observation type
///
/// Serialized as the lowercase names the collector understands. Unknown
/// names survive a round trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Xhr,
    Fetch,
    Click,
    History,
    Hashchange,
    Resource,
    UnhandledRejection,
    Error,
    Custom,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Xhr => "xhr",
            EventType::Fetch => "fetch",
            EventType::Click => "click",
            EventType::History => "history",
            EventType::Hashchange => "hashchange",
            EventType::Resource => "resource",
            EventType::UnhandledRejection => "unhandledrejection",
            EventType::Error => "error",
            EventType::Custom => "custom",
            EventType::Other(name) => name,
        }
    }

}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        match value {
            "xhr" => EventType::Xhr,
            "fetch" => EventType::Fetch,
            "click" => EventType::Click,
            "history" => EventType::History,
            "hashchange" => EventType::Hashchange,
            "resource" => EventType::Resource,
            "unhandledrejection" => EventType::UnhandledRejection,
            "error" => EventType::Error,
            "custom" => EventType::Custom,
            other => EventType::Other(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        EventType::from(value.as_str())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse breadcrumb grouping used for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbCategory {
    Http,
    Click,
    Route,
    Resource,
    CodeError,
    Custom,
}

impl BreadcrumbCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreadcrumbCategory::Http => "http",
            BreadcrumbCategory::Click => "click",
            BreadcrumbCategory::Route => "route",
            BreadcrumbCategory::Resource => "resource",
            BreadcrumbCategory::CodeError => "code_error",
            BreadcrumbCategory::Custom => "custom",
        }
    }
}

/// Outcome of an observed action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Code error location and message
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub message: Option<String>,
    pub file_name: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Completed HTTP call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRecord {
    pub method: String,
    pub url: String,
    /// Request duration in milliseconds
    pub elapsed_time: u64,
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

/// Failed resource load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub tag_name: String,
    pub url: String,
    pub outer_html: String,
}

/// Route change, as relative paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub from: String,
    pub to: String,
}

/// Clicked element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickRecord {
    pub target: String,
}

/// Manually reported log line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub message: String,
    pub tag: String,
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Kind-specific payload
///
/// Serialized without a tag: the owning record carries `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventData {
    Http(HttpRecord),
    Error(ErrorRecord),
    Resource(ResourceRecord),
    Route(RouteRecord),
    Click(ClickRecord),
    Log(LogRecord),
    Custom(Map<String, Value>),
}

impl EventData {
    /// Wrap an arbitrary value as custom data. Non-object values are nested
    /// under `value` so the payload can be flattened into a report.
    pub fn custom(value: Value) -> Self {
        match value {
            Value::Object(map) => EventData::Custom(map),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                EventData::Custom(map)
            }
        }
    }
}

/// Normalized, network-bound record produced by a transformer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub status: Status,
    pub time: i64,
    #[serde(flatten)]
    pub data: EventData,
}

impl CanonicalRecord {
    pub fn new(event_type: EventType, status: Status, data: EventData) -> Self {
        Self {
            event_type,
            status,
            time: now_millis(),
            data,
        }
    }

    /// Error fields, when this is a code error record
    pub fn error(&self) -> Option<&ErrorRecord> {
        match &self.data {
            EventData::Error(record) => Some(record),
            _ => None,
        }
    }

    /// HTTP fields, when this is an HTTP record
    pub fn http(&self) -> Option<&HttpRecord> {
        match &self.data {
            EventData::Http(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names_round_trip() {
        for name in [
            "xhr",
            "fetch",
            "click",
            "history",
            "hashchange",
            "resource",
            "unhandledrejection",
            "error",
            "custom",
            "performance",
        ] {
            assert_eq!(EventType::from(name).as_str(), name);
        }
        assert_eq!(
            EventType::from("performance"),
            EventType::Other("performance".to_string())
        );
    }

    #[test]
    fn canonical_record_flattens_kind_fields() {
        let record = CanonicalRecord {
            event_type: EventType::Error,
            status: Status::Error,
            time: 1_700_000_000_000,
            data: EventData::Error(ErrorRecord {
                message: Some("boom".to_string()),
                file_name: Some("app.js".to_string()),
                line: Some(3),
                column: None,
            }),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["status"], "error");
        assert_eq!(json["fileName"], "app.js");
        assert_eq!(json["line"], 3);
        assert!(json["column"].is_null());
    }

    #[test]
    fn custom_data_wraps_scalars() {
        let data = EventData::custom(serde_json::json!(42));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"value": 42}));
    }
}

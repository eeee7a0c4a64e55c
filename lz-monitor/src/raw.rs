//! Raw observations, as delivered by the browser-side hooks

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::EventType;

/// Description of a DOM element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInfo {
    /// Lowercase tag name; only present on real elements
    pub local_name: Option<String>,
    pub tag_name: Option<String>,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub inner_text: Option<String>,
    pub src: Option<String>,
    pub href: Option<String>,
}

impl ElementInfo {
    /// An element with the given tag
    pub fn element(tag: &str) -> Self {
        Self {
            local_name: Some(tag.to_lowercase()),
            tag_name: Some(tag.to_uppercase()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.inner_text = Some(text.to_string());
        self
    }

    pub fn with_src(mut self, src: &str) -> Self {
        self.src = Some(src.to_string());
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }
}

/// Error object as thrown by script code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorLike {
    pub name: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl ErrorLike {
    pub fn new(message: &str, stack: &str) -> Self {
        Self {
            name: Some("Error".to_string()),
            message: Some(message.to_string()),
            stack: Some(stack.to_string()),
        }
    }
}

/// Error observation: either a bare error handed over by a framework
/// integration, or a DOM `ErrorEvent`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorTarget {
    /// Event target; an element with a `localName` means a resource failed
    pub target: Option<ElementInfo>,

    /// The thrown error carried by an `ErrorEvent`
    pub error: Option<ErrorLike>,

    pub message: Option<String>,
    pub name: Option<String>,
    pub stack: Option<String>,

    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub colno: Option<u32>,
}

impl ErrorTarget {
    /// A bare error without a DOM target
    pub fn from_error(error: ErrorLike) -> Self {
        Self {
            message: error.message.clone(),
            name: error.name.clone(),
            stack: error.stack.clone(),
            ..Self::default()
        }
    }

    /// An `ErrorEvent` dispatched on the window
    pub fn error_event(message: &str, error: Option<ErrorLike>) -> Self {
        Self {
            target: Some(ElementInfo::default()),
            error,
            message: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A resource load failure on `element`
    pub fn resource_failure(element: ElementInfo) -> Self {
        Self {
            target: Some(element),
            ..Self::default()
        }
    }

    /// Attach the location fields of an `ErrorEvent`
    pub fn with_location(mut self, filename: &str, lineno: u32, colno: u32) -> Self {
        self.filename = Some(filename.to_string());
        self.lineno = Some(lineno);
        self.colno = Some(colno);
        self
    }

    /// Target element when it is a real element
    pub fn element(&self) -> Option<&ElementInfo> {
        self.target.as_ref().filter(|t| t.local_name.is_some())
    }
}

/// `unhandledrejection` observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionEvent {
    /// Rejection reason: an error-like object or any value
    pub reason: Value,
}

/// Completed XHR or fetch call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    /// HTTP status code, 0 when the request never completed
    pub status: u16,
    /// Duration in milliseconds
    pub elapsed_time: u64,
    pub request_data: Option<Value>,
    pub response_data: Option<Value>,
    /// Start time in milliseconds since the epoch
    pub time: Option<i64>,
}

impl HttpRequest {
    pub fn new(method: &str, url: &str, status: u16) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            status,
            ..Self::default()
        }
    }
}

/// Pair of absolute URLs around a navigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteChange {
    pub from: String,
    pub to: String,
}

impl RouteChange {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Event of a user-defined kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomEvent {
    /// Kind name a plugin subscribes to
    pub name: String,
    pub data: Value,
}

/// Any observation the pipeline accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawEvent {
    Xhr(HttpRequest),
    Fetch(HttpRequest),
    Click(ElementInfo),
    History(RouteChange),
    Hashchange(RouteChange),
    Error(ErrorTarget),
    Unhandledrejection(RejectionEvent),
    Custom(CustomEvent),
}

impl RawEvent {
    /// Observation type this event is dispatched under
    pub fn event_type(&self) -> EventType {
        match self {
            RawEvent::Xhr(_) => EventType::Xhr,
            RawEvent::Fetch(_) => EventType::Fetch,
            RawEvent::Click(_) => EventType::Click,
            RawEvent::History(_) => EventType::History,
            RawEvent::Hashchange(_) => EventType::Hashchange,
            RawEvent::Error(target) if target.element().is_some() => EventType::Resource,
            RawEvent::Error(_) => EventType::Error,
            RawEvent::Unhandledrejection(_) => EventType::UnhandledRejection,
            RawEvent::Custom(custom) => match EventType::from(custom.name.as_str()) {
                EventType::Other(name) => EventType::Other(name),
                _ => EventType::Custom,
            },
        }
    }
}

/// Manually reported log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub message: String,
    pub tag: String,
    pub level: String,
    /// Rendered error attached to the log, if any
    pub error: Option<String>,
}

impl LogEntry {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            message: String::new(),
            tag: String::new(),
            level: "high".to_string(),
            error: None,
        }
    }
}

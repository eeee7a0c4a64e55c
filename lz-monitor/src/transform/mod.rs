//! Transformers: raw observations to canonical records
//!
//! Every transformer is a pure function of its input (plus the clock).
//! Parse failures never abort a transform; missing fields stay `None`.

pub mod element;
pub mod error;
pub mod http;
pub mod resource;
pub mod route;
pub mod stack;
pub mod url;

pub use element::element_as_string;
pub use error::{transform_error, transform_rejection, ErrorOutcome};
pub use http::{is_success_status, transform_http, HttpStatusPredicate};
pub use resource::transform_resource;
pub use route::{relative_or_root, transform_route};
pub use stack::{parse_stack, top_frame, StackFrame};
pub use url::{parse_url, ParsedUrl};

use crate::event::{CanonicalRecord, ClickRecord, EventData, EventType, LogRecord, Status};
use crate::raw::{ElementInfo, LogEntry};

/// Build a click record; `None` for elements that render empty
pub fn transform_click(element: &ElementInfo) -> Option<CanonicalRecord> {
    let target = element_as_string(element);
    if target.is_empty() {
        return None;
    }
    Some(CanonicalRecord::new(
        EventType::Click,
        Status::Ok,
        EventData::Click(ClickRecord { target }),
    ))
}

/// Build the record of a manually reported log line
pub fn transform_log(entry: &LogEntry) -> CanonicalRecord {
    CanonicalRecord::new(
        EventType::Custom,
        Status::Error,
        EventData::Log(LogRecord {
            message: entry.message.clone(),
            tag: entry.tag.clone(),
            level: entry.level.clone(),
            error: entry.error.clone(),
        }),
    )
}

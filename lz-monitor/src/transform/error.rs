//! Code error and unhandled rejection transformers

use serde_json::Value;

use crate::event::{CanonicalRecord, ErrorRecord, EventData, EventType, Status};
use crate::raw::{ErrorTarget, RejectionEvent};

use super::resource::transform_resource;
use super::stack::{top_frame, StackFrame};

/// What an error observation turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorOutcome {
    /// A script error with location fields
    Code(CanonicalRecord),
    /// An element failed to load
    Resource(CanonicalRecord),
}

/// Pick the stack to parse: a bare error carries its own, an `ErrorEvent`
/// carries it on `error`. Each side falls back to the other.
fn stack_source(event: &ErrorTarget) -> Option<&str> {
    let own = event.stack.as_deref();
    let inner = event.error.as_ref().and_then(|e| e.stack.as_deref());
    if event.target.is_none() {
        own.or(inner)
    } else {
        inner.or(own)
    }
}

fn error_record(
    message: Option<String>,
    stack: Option<&str>,
    fallback: (Option<&str>, Option<u32>, Option<u32>),
) -> ErrorRecord {
    let frame = stack.and_then(top_frame);
    if frame.is_none() {
        tracing::warn!(
            has_stack = stack.is_some(),
            "lz-monitor: no parsable stack frame, using event location"
        );
    }
    let StackFrame {
        file_name,
        line_number,
        column_number,
        ..
    } = frame.unwrap_or_default();
    let (fallback_file, fallback_line, fallback_column) = fallback;

    ErrorRecord {
        message,
        file_name: file_name.or_else(|| fallback_file.map(str::to_string)),
        line: line_number.or(fallback_line),
        column: column_number.or(fallback_column),
    }
}

/// Classify and normalize an error observation
pub fn transform_error(event: &ErrorTarget) -> ErrorOutcome {
    if let Some(element) = event.element() {
        return ErrorOutcome::Resource(transform_resource(element));
    }

    let message = event
        .message
        .clone()
        .or_else(|| event.error.as_ref().and_then(|e| e.message.clone()));
    let record = error_record(
        message,
        stack_source(event),
        (event.filename.as_deref(), event.lineno, event.colno),
    );

    ErrorOutcome::Code(CanonicalRecord::new(
        EventType::Error,
        Status::Error,
        EventData::Error(record),
    ))
}

/// Normalize an unhandled promise rejection
pub fn transform_rejection(event: &RejectionEvent) -> CanonicalRecord {
    let (message, stack) = match &event.reason {
        Value::Object(reason) => {
            let message = reason.get("message").and_then(Value::as_str).map(str::to_string);
            let stack = reason.get("stack").and_then(Value::as_str);
            let message = message.or_else(|| {
                stack.is_none().then(|| event.reason.to_string())
            });
            (message, stack)
        }
        Value::String(reason) => (Some(reason.clone()), None),
        Value::Null => (None, None),
        other => (Some(other.to_string()), None),
    };

    CanonicalRecord::new(
        EventType::UnhandledRejection,
        Status::Error,
        EventData::Error(error_record(message, stack, (None, None, None))),
    )
}

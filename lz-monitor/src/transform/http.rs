//! HTTP call transformer

use std::sync::Arc;

use crate::event::{now_millis, CanonicalRecord, EventData, EventType, HttpRecord, Status};
use crate::raw::HttpRequest;

/// Decides whether a completed call counts as ok
pub type HttpStatusPredicate = Arc<dyn Fn(&HttpRecord) -> bool + Send + Sync>;

/// Default policy: any 2xx status is ok
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Build the record of a completed XHR or fetch call
pub fn transform_http(
    event_type: EventType,
    request: &HttpRequest,
    predicate: Option<&HttpStatusPredicate>,
) -> CanonicalRecord {
    let record = HttpRecord {
        method: request.method.to_uppercase(),
        url: request.url.clone(),
        elapsed_time: request.elapsed_time,
        http_status: request.status,
        request_data: request.request_data.clone(),
        response_data: request.response_data.clone(),
    };

    let ok = match predicate {
        Some(predicate) => predicate(&record),
        None => is_success_status(record.http_status),
    };

    CanonicalRecord {
        event_type,
        status: if ok { Status::Ok } else { Status::Error },
        time: request.time.unwrap_or_else(now_millis),
        data: EventData::Http(record),
    }
}

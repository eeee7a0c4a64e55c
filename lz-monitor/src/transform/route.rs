//! History and hashchange transformers

use crate::event::{CanonicalRecord, EventData, EventType, RouteRecord, Status};
use crate::raw::RouteChange;

use super::url::parse_url;

/// Relative part of an absolute URL, `/` when absent or unparsable
pub fn relative_or_root(url: &str) -> String {
    let parsed = parse_url(url);
    if parsed.is_empty() && !url.is_empty() {
        tracing::warn!(url = %url, "lz-monitor: unparsable route URL, using /");
    }
    parsed
        .relative
        .filter(|relative| !relative.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

/// Build a route-change record. Route changes are never failures.
pub fn transform_route(event_type: EventType, change: &RouteChange) -> CanonicalRecord {
    CanonicalRecord::new(
        event_type,
        Status::Ok,
        EventData::Route(RouteRecord {
            from: relative_or_root(&change.from),
            to: relative_or_root(&change.to),
        }),
    )
}

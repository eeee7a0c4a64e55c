//! Resource load failure transformer

use crate::event::{CanonicalRecord, EventData, EventType, ResourceRecord, Status};
use crate::raw::ElementInfo;

use super::element::element_as_string;

/// Build the record of an element that failed to load
pub fn transform_resource(element: &ElementInfo) -> CanonicalRecord {
    let tag_name = element
        .local_name
        .as_deref()
        .or(element.tag_name.as_deref())
        .unwrap_or("")
        .to_lowercase();
    let url = element
        .src
        .as_deref()
        .or(element.href.as_deref())
        .unwrap_or("")
        .to_string();

    CanonicalRecord::new(
        EventType::Resource,
        Status::Error,
        EventData::Resource(ResourceRecord {
            tag_name,
            url,
            outer_html: element_as_string(element),
        }),
    )
}

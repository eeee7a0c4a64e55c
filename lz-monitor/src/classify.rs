//! Event classifier: raw observation type to breadcrumb category

use crate::event::{BreadcrumbCategory, EventType};

/// Map an event type to its breadcrumb category.
///
/// Total over every `EventType`; unrecognised kinds fall into `Custom`.
pub fn classify(event_type: &EventType) -> BreadcrumbCategory {
    match event_type {
        EventType::Xhr | EventType::Fetch => BreadcrumbCategory::Http,
        EventType::Click => BreadcrumbCategory::Click,
        EventType::History | EventType::Hashchange => BreadcrumbCategory::Route,
        EventType::Resource => BreadcrumbCategory::Resource,
        EventType::UnhandledRejection | EventType::Error => BreadcrumbCategory::CodeError,
        EventType::Custom | EventType::Other(_) => BreadcrumbCategory::Custom,
    }
}

/// Classify a type given by name, as received from a plugin or the wire
pub fn classify_name(name: &str) -> BreadcrumbCategory {
    classify(&EventType::from(name))
}

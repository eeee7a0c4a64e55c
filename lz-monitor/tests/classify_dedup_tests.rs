//! Classifier and dedup gate tests

use lz_monitor::classify::classify_name;
use lz_monitor::{classify, signature_of, BreadcrumbCategory, DedupTable, EventType};

#[test]
fn test_classify_table() {
    assert_eq!(classify(&EventType::Fetch), BreadcrumbCategory::Http);
    assert_eq!(classify(&EventType::Xhr), BreadcrumbCategory::Http);
    assert_eq!(classify(&EventType::Click), BreadcrumbCategory::Click);
    assert_eq!(classify(&EventType::History), BreadcrumbCategory::Route);
    assert_eq!(classify(&EventType::Hashchange), BreadcrumbCategory::Route);
    assert_eq!(classify(&EventType::Resource), BreadcrumbCategory::Resource);
    assert_eq!(classify(&EventType::UnhandledRejection), BreadcrumbCategory::CodeError);
    assert_eq!(classify(&EventType::Error), BreadcrumbCategory::CodeError);
    assert_eq!(classify(&EventType::Custom), BreadcrumbCategory::Custom);
}

#[test]
fn test_classify_unknown_is_custom() {
    assert_eq!(classify_name("unknown"), BreadcrumbCategory::Custom);
    assert_eq!(classify_name("fetch"), BreadcrumbCategory::Http);
    assert_eq!(classify(&EventType::Other("vue".to_string())), BreadcrumbCategory::Custom);
}

#[test]
fn test_signature_is_deterministic() {
    let a = signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(5));
    let b = signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(5));
    assert_eq!(a, b);
}

#[test]
fn test_signature_distinguishes_fields() {
    let base = signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(5));

    assert_ne!(base, signature_of(&EventType::Error, Some("Y"), Some("a.js"), Some(5)));
    assert_ne!(base, signature_of(&EventType::Error, Some("X"), Some("b.js"), Some(5)));
    assert_ne!(base, signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(6)));
    assert_ne!(
        base,
        signature_of(&EventType::UnhandledRejection, Some("X"), Some("a.js"), Some(5))
    );
}

#[test]
fn test_missing_fields_still_sign() {
    let sig = signature_of(&EventType::Error, None, None, None);
    assert!(!sig.is_empty());
    assert_eq!(sig, signature_of(&EventType::Error, None, None, None));
}

#[test]
fn test_first_occurrence_is_unseen() {
    let table = DedupTable::new();
    let sig = signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(5));

    assert!(!table.has_been_seen(&sig));
    assert!(table.has_been_seen(&sig));
    assert!(table.has_been_seen(&sig));

    assert!(table.contains(&sig));
    assert_eq!(table.len(), 1);

    let stats = table.stats();
    assert_eq!(stats.distinct, 1);
    assert_eq!(stats.repeats, 2);
}

#[test]
fn test_distinct_signatures_tracked_separately() {
    let table = DedupTable::new();

    assert!(!table.has_been_seen("a"));
    assert!(!table.has_been_seen("b"));
    assert_eq!(table.len(), 2);
    assert!(!table.contains("c"));
}

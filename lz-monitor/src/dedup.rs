//! Deduplication gate for code errors
//!
//! A signature is a reversible encoding of the error identity, not a hash
//! in the cryptographic sense. It is only used as a session-local key.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::event::EventType;

const MISSING: &str = "undefined";

/// Derive the dedup signature of an error.
///
/// Same inputs always produce the same signature.
pub fn signature_of(
    kind: &EventType,
    message: Option<&str>,
    file_name: Option<&str>,
    column: Option<u32>,
) -> String {
    let column = column.map(|c| c.to_string());
    let joined = format!(
        "{}-{}-{}-{}",
        kind,
        message.unwrap_or(MISSING),
        file_name.unwrap_or(MISSING),
        column.as_deref().unwrap_or(MISSING),
    );
    STANDARD.encode(joined.as_bytes())
}

/// Dedup statistics
#[derive(Debug, Clone, Serialize)]
pub struct DedupStats {
    /// Distinct signatures seen
    pub distinct: usize,

    /// Checks that found a known signature
    pub repeats: u64,
}

/// Session-wide set of seen error signatures
///
/// Never pruned; it lives exactly as long as the monitoring session.
pub struct DedupTable {
    seen: Mutex<HashSet<String>>,
    repeats: AtomicU64,
}

impl DedupTable {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            repeats: AtomicU64::new(0),
        }
    }

    /// Report whether `signature` was seen before, marking it seen.
    ///
    /// Not a pure query: the first call for a fresh signature returns
    /// `false`, every later call returns `true`.
    pub fn has_been_seen(&self, signature: &str) -> bool {
        let inserted = self.lock().insert(signature.to_string());
        if !inserted {
            self.repeats.fetch_add(1, Ordering::SeqCst);
        }
        !inserted
    }

    /// Read-only membership check
    pub fn contains(&self, signature: &str) -> bool {
        self.lock().contains(signature)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> DedupStats {
        DedupStats {
            distinct: self.len(),
            repeats: self.repeats.load(Ordering::SeqCst),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DedupTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_decodes_to_joined_identity() {
        let sig = signature_of(&EventType::Error, Some("X"), Some("a.js"), Some(5));
        let decoded = STANDARD.decode(sig).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "error-X-a.js-5");
    }

    #[test]
    fn missing_fields_render_as_undefined() {
        let sig = signature_of(&EventType::UnhandledRejection, None, None, None);
        let decoded = String::from_utf8(STANDARD.decode(sig).unwrap()).unwrap();
        assert_eq!(decoded, "unhandledrejection-undefined-undefined-undefined");
    }
}

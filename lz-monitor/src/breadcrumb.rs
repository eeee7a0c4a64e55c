//! Breadcrumb store: bounded, time-ordered history of user-visible actions

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::classify::classify;
use crate::config::{MonitorOptions, DEFAULT_MAX_BREADCRUMBS};
use crate::event::{now_millis, BreadcrumbCategory, CanonicalRecord, EventData, EventType, Status};

/// Hook run before a breadcrumb is stored. `None` vetoes the insert.
pub type BeforePushHook = Arc<dyn Fn(BreadcrumbRecord) -> Option<BreadcrumbRecord> + Send + Sync>;

/// One recorded action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadcrumbRecord {
    /// Raw observation type
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Category derived from the type
    pub category: BreadcrumbCategory,

    pub status: Status,

    /// Milliseconds since the epoch; filled at insert time when unset
    pub time: Option<i64>,

    pub data: EventData,
}

impl BreadcrumbRecord {
    /// Create a record, deriving its category from the event type
    pub fn new(event_type: EventType, status: Status, data: EventData) -> Self {
        Self {
            category: classify(&event_type),
            event_type,
            status,
            time: None,
            data,
        }
    }

    /// Breadcrumb mirroring a canonical record
    pub fn from_record(record: &CanonicalRecord) -> Self {
        Self::new(record.event_type.clone(), record.status, record.data.clone()).at(record.time)
    }

    /// Set an explicit timestamp
    pub fn at(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    fn sort_key(&self) -> i64 {
        self.time.unwrap_or_default()
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct BreadcrumbStats {
    /// Records currently held
    pub len: usize,

    pub capacity: usize,

    /// Records accepted since creation
    pub total_pushed: u64,

    /// Records dropped by the before-push hook
    pub total_vetoed: u64,

    /// Records evicted to make room
    pub total_evicted: u64,
}

/// Bounded breadcrumb store
///
/// Records are always held in non-decreasing `time` order; records with
/// equal timestamps keep their insertion order.
pub struct BreadcrumbStore {
    capacity: usize,
    before_push: Option<BeforePushHook>,
    records: Mutex<VecDeque<BreadcrumbRecord>>,

    total_pushed: AtomicU64,
    total_vetoed: AtomicU64,
    total_evicted: AtomicU64,
}

impl BreadcrumbStore {
    /// Create a store; a zero capacity falls back to the default
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_MAX_BREADCRUMBS } else { capacity };
        Self {
            capacity,
            before_push: None,
            records: Mutex::new(VecDeque::new()),
            total_pushed: AtomicU64::new(0),
            total_vetoed: AtomicU64::new(0),
            total_evicted: AtomicU64::new(0),
        }
    }

    /// Create a store configured from monitor options
    pub fn with_options(options: &MonitorOptions) -> Self {
        let mut store = Self::new(DEFAULT_MAX_BREADCRUMBS);
        store.bind_options(options);
        store
    }

    /// Apply capacity and hook from options. A zero capacity is rejected
    /// and the current one kept.
    pub fn bind_options(&mut self, options: &MonitorOptions) {
        if options.max_breadcrumbs == 0 {
            tracing::error!(
                capacity = self.capacity,
                "lz-monitor: maxBreadcrumbs must be positive, keeping current capacity"
            );
        } else {
            self.capacity = options.max_breadcrumbs;
        }

        if let Some(hook) = &options.before_push_breadcrumb {
            self.before_push = Some(Arc::clone(hook));
        }
    }

    /// Install or replace the before-push hook
    pub fn set_before_push(&mut self, hook: BeforePushHook) {
        self.before_push = Some(hook);
    }

    /// Push a record through the before-push hook.
    ///
    /// Returns whether the record was stored. The hook runs without the
    /// store lock held, so it may itself push. A panicking hook unwinds to
    /// the caller.
    pub fn push(&self, record: BreadcrumbRecord) -> bool {
        let record = match &self.before_push {
            Some(hook) => match hook(record) {
                Some(record) => record,
                None => {
                    self.total_vetoed.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!("lz-monitor: breadcrumb vetoed by beforePushBreadcrumb");
                    return false;
                }
            },
            None => record,
        };

        self.immediate_push(record);
        true
    }

    /// Store a record without consulting the hook
    pub fn immediate_push(&self, mut record: BreadcrumbRecord) {
        if record.time.is_none() {
            record.time = Some(now_millis());
        }

        let mut records = self.lock();
        if records.len() >= self.capacity {
            records.pop_front();
            self.total_evicted.fetch_add(1, Ordering::SeqCst);
        }
        records.push_back(record);

        // Stable: equal timestamps keep insertion order
        records.make_contiguous().sort_by_key(BreadcrumbRecord::sort_key);

        self.total_pushed.fetch_add(1, Ordering::SeqCst);
    }

    /// Remove and return the oldest record
    pub fn shift(&self) -> Option<BreadcrumbRecord> {
        self.lock().pop_front()
    }

    /// Drop all records
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of the current records, oldest first
    pub fn get_all(&self) -> Vec<BreadcrumbRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> BreadcrumbStats {
        BreadcrumbStats {
            len: self.len(),
            capacity: self.capacity,
            total_pushed: self.total_pushed.load(Ordering::SeqCst),
            total_vetoed: self.total_vetoed.load(Ordering::SeqCst),
            total_evicted: self.total_evicted.load(Ordering::SeqCst),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<BreadcrumbRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BreadcrumbStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS)
    }
}

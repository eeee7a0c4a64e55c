//! lz-monitor - Front-end event capture pipeline
//!
//! The monitor is the client-side half of an error/behavior monitoring
//! system. It:
//! - Normalizes raw observations (errors, rejections, HTTP calls, route
//!   changes, clicks, resource failures) into canonical records
//! - Keeps a bounded, time-ordered breadcrumb history of what the user did
//! - Suppresses duplicate code-error reports within a session
//! - Hands reports to a transport without waiting on it
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MONITOR                               │
//! │                                                              │
//! │   RawEvent ──► dispatch ──► handle_* (one failure boundary  │
//! │                    │         per event)                      │
//! │                    │                                         │
//! │         ┌──────────┼──────────────┬──────────────┐          │
//! │         ▼          ▼              ▼              ▼          │
//! │  ┌────────────┐ ┌──────────┐ ┌────────────┐ ┌─────────┐     │
//! │  │ Transform  │ │ Classify │ │ Breadcrumb │ │  Dedup  │     │
//! │  │            │ │          │ │   Store    │ │  Table  │     │
//! │  └────────────┘ └──────────┘ └────────────┘ └─────────┘     │
//! │                          │                                   │
//! │                    ┌─────▼─────┐                             │
//! │                    │ Reporter  │──► Transport (fire&forget) │
//! │                    └───────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lz_monitor::{Monitor, MonitorOptions, MemoryTransport, RawEvent};
//!
//! let options = MonitorOptions::builder()
//!     .dsn("https://collector.example.com/report")
//!     .api_key("project-key")
//!     .build();
//! let monitor = Monitor::init(options, Arc::new(MemoryTransport::new()))?;
//!
//! monitor.dispatch(RawEvent::Error(error_event));
//! ```

pub mod breadcrumb;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod device;
pub mod error;
pub mod event;
pub mod handlers;
pub mod plugin;
pub mod raw;
pub mod report;
pub mod transform;
pub mod transport;

pub use breadcrumb::{BreadcrumbRecord, BreadcrumbStore};
pub use classify::classify;
pub use config::{EventSwitches, MonitorOptions, OptionsBuilder};
pub use dedup::{signature_of, DedupTable};
pub use device::DeviceInfo;
pub use error::{MonitorError, MonitorResult};
pub use event::{BreadcrumbCategory, CanonicalRecord, EventData, EventType, Status};
pub use handlers::HandleOutcome;
pub use plugin::{MonitorPlugin, PluginContext};
pub use raw::RawEvent;
pub use report::{ReportPayload, Reporter};
pub use transport::{ChannelTransport, MemoryTransport, NullTransport, Transport};

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::plugin::PluginRegistry;

pub const SDK_NAME: &str = "lz-monitor";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One monitoring session
///
/// Owns the breadcrumb store and the dedup table for the lifetime of the
/// page session. Handlers run one at a time per call but tolerate being
/// re-entered from a hook or transport.
pub struct Monitor {
    options: MonitorOptions,

    breadcrumbs: BreadcrumbStore,

    dedup: DedupTable,

    reporter: Reporter,

    plugins: PluginRegistry,

    /// Time of the last accepted click, for throttling
    last_click: Mutex<Option<i64>>,

    events_handled: AtomicU64,
    handler_failures: AtomicU64,
}

impl Monitor {
    /// Start a session. Fails when `dsn` or `apiKey` is missing.
    pub fn init(options: MonitorOptions, transport: Arc<dyn Transport>) -> MonitorResult<Self> {
        Self::with_device(options, DeviceInfo::default(), transport)
    }

    /// Start a session with a device fact sheet read from the user agent
    pub fn with_device(
        options: MonitorOptions,
        device_info: DeviceInfo,
        transport: Arc<dyn Transport>,
    ) -> MonitorResult<Self> {
        options.validate_required()?;

        let breadcrumbs = BreadcrumbStore::with_options(&options);
        let reporter = Reporter::new(&options, device_info, transport);

        tracing::debug!(
            uuid = %reporter.uuid(),
            transport = %reporter.transport_name(),
            max_breadcrumbs = breadcrumbs.capacity(),
            "lz-monitor: session started"
        );

        Ok(Self {
            options,
            breadcrumbs,
            dedup: DedupTable::new(),
            reporter,
            plugins: PluginRegistry::new(),
            last_click: Mutex::new(None),
            events_handled: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        })
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    pub fn breadcrumbs(&self) -> &BreadcrumbStore {
        &self.breadcrumbs
    }

    pub fn dedup(&self) -> &DedupTable {
        &self.dedup
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Session identifier
    pub fn uuid(&self) -> &str {
        self.reporter.uuid()
    }

    /// Route a raw observation to its handler.
    ///
    /// Never fails: a handler error or panic is logged and counted, and
    /// the next event is handled normally.
    pub fn dispatch(&self, event: RawEvent) -> HandleOutcome {
        if self.options.disabled {
            return HandleOutcome::default();
        }

        let event_type = event.event_type();
        if !self.options.switches.is_enabled(&event_type) {
            tracing::debug!(event_type = %event_type, "lz-monitor: capture disabled for kind");
            return HandleOutcome::default();
        }

        self.events_handled.fetch_add(1, Ordering::SeqCst);

        self.guard(&event_type, || match &event {
            RawEvent::Xhr(request) => self.handle_http(EventType::Xhr, request),
            RawEvent::Fetch(request) => self.handle_http(EventType::Fetch, request),
            RawEvent::Click(element) => self.handle_click(element),
            RawEvent::History(change) => self.handle_history(change),
            RawEvent::Hashchange(change) => self.handle_hashchange(change),
            RawEvent::Error(target) => self.handle_error(target),
            RawEvent::Unhandledrejection(rejection) => self.handle_unhandled_rejection(rejection),
            RawEvent::Custom(custom) => self.handle_custom(custom),
        })
    }

    /// Report a log line by hand
    pub fn log(&self, entry: raw::LogEntry) -> HandleOutcome {
        if self.options.disabled {
            return HandleOutcome::default();
        }
        self.guard(&EventType::Custom, || self.handle_log(&entry))
    }

    /// Register a plugin for a user-defined event kind.
    ///
    /// Returns false when the kind is disabled or already claimed.
    pub fn use_plugin(&self, plugin: Arc<dyn MonitorPlugin>) -> bool {
        let event_type = plugin.event_type();
        if self.options.disabled || !self.options.switches.is_enabled(&event_type) {
            return false;
        }
        if !self.plugins.register(Arc::clone(&plugin)) {
            return false;
        }

        let ctx = self.plugin_context();
        match panic::catch_unwind(AssertUnwindSafe(|| plugin.setup(&ctx))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(event_type = %event_type, error = %err, "lz-monitor: plugin setup failed");
            }
            Err(_) => {
                tracing::error!(event_type = %event_type, "lz-monitor: plugin setup panicked");
            }
        }
        true
    }

    /// Get session statistics
    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            events_handled: self.events_handled.load(Ordering::SeqCst),
            reports_sent: self.reporter.sent_count(),
            duplicates_suppressed: self.dedup.stats().repeats,
            breadcrumbs_recorded: self.breadcrumbs.stats().total_pushed,
            handler_failures: self.handler_failures.load(Ordering::SeqCst),
        }
    }

    pub(crate) fn plugin_context(&self) -> PluginContext<'_> {
        PluginContext {
            reporter: &self.reporter,
            breadcrumbs: &self.breadcrumbs,
            options: &self.options,
        }
    }

    /// Per-event failure boundary
    fn guard<F>(&self, event_type: &EventType, handler: F) -> HandleOutcome
    where
        F: FnOnce() -> MonitorResult<HandleOutcome>,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(handler))
            .unwrap_or_else(|_| Err(MonitorError::HandlerPanicked(event_type.clone())));

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.handler_failures.fetch_add(1, Ordering::SeqCst);
                tracing::error!(event_type = %event_type, error = %err, "lz-monitor: handler failed");
                HandleOutcome::default()
            }
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Serialize)]
pub struct MonitorStats {
    /// Events that passed the switches and reached a handler
    pub events_handled: u64,

    /// Reports handed to the transport
    pub reports_sent: u64,

    /// Code errors not reported because their signature was seen
    pub duplicates_suppressed: u64,

    /// Breadcrumbs accepted by the store
    pub breadcrumbs_recorded: u64,

    /// Handlers that returned an error or panicked
    pub handler_failures: u64,
}

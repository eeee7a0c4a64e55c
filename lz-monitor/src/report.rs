//! Report envelope and the reporter that hands it to a transport

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::breadcrumb::BreadcrumbRecord;
use crate::config::MonitorOptions;
use crate::device::DeviceInfo;
use crate::event::CanonicalRecord;
use crate::transport::Transport;
use crate::SDK_VERSION;

/// Hook run on every outgoing report. `None` drops the report.
pub type BeforeReportHook = Arc<dyn Fn(ReportPayload) -> Option<ReportPayload> + Send + Sync>;

/// Legacy field names and their canonical replacements
const LEGACY_FIELDS: [(&str, &str); 3] = [
    ("appId", "apiKey"),
    ("sessionId", "uuid"),
    ("timestamp", "time"),
];

/// Wire shape sent to the collector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub api_key: String,

    /// Per-session identifier
    pub uuid: String,

    pub sdk_version: String,

    pub page_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// `type`, `status`, `time` and the kind-specific fields
    #[serde(flatten)]
    pub record: CanonicalRecord,

    pub device_info: DeviceInfo,

    /// Breadcrumb history at send time, oldest first
    pub breadcrumb: Vec<BreadcrumbRecord>,
}

/// Rewrite legacy field names (`appId`, `sessionId`, `timestamp`) to their
/// canonical names. When both are present the canonical value is kept.
pub fn normalize_legacy_fields(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    for (legacy, canonical) in LEGACY_FIELDS {
        if let Some(old) = map.remove(legacy) {
            map.entry(canonical).or_insert(old);
        }
    }
}

/// Builds report envelopes and forwards them to the transport
pub struct Reporter {
    api_key: String,
    uuid: String,
    page_url: String,
    user_id: Option<String>,
    device_info: DeviceInfo,
    before_data_report: Option<BeforeReportHook>,
    transport: Arc<dyn Transport>,

    sent: AtomicU64,
    dropped: AtomicU64,
}

impl Reporter {
    pub fn new(options: &MonitorOptions, device_info: DeviceInfo, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_key: options.api_key.clone(),
            uuid: uuid::Uuid::new_v4().to_string(),
            page_url: options.page_url.clone(),
            user_id: options.user_id.clone(),
            device_info,
            before_data_report: options.before_data_report.clone(),
            transport,
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Session identifier stamped on every report
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Wrap a record in the wire envelope
    pub fn envelope(&self, record: CanonicalRecord, breadcrumb: Vec<BreadcrumbRecord>) -> ReportPayload {
        ReportPayload {
            api_key: self.api_key.clone(),
            uuid: self.uuid.clone(),
            sdk_version: SDK_VERSION.to_string(),
            page_url: self.page_url.clone(),
            user_id: self.user_id.clone(),
            record,
            device_info: self.device_info.clone(),
            breadcrumb,
        }
    }

    /// Envelope and send a record. Returns whether it reached the transport.
    pub fn send(&self, record: CanonicalRecord, breadcrumb: Vec<BreadcrumbRecord>) -> bool {
        let mut report = self.envelope(record, breadcrumb);

        if let Some(hook) = &self.before_data_report {
            match hook(report) {
                Some(rewritten) => report = rewritten,
                None => {
                    self.dropped.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!("lz-monitor: report dropped by beforeDataReport");
                    return false;
                }
            }
        }

        self.transport.send(report);
        self.sent.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Reports handed to the transport
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    /// Reports dropped by the before-report hook
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }
}

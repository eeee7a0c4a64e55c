//! Transport backends for outgoing reports
//!
//! Sending is fire-and-forget from the pipeline's point of view: `send`
//! never blocks and never reports failure back. Batching, retry and the
//! actual network call belong to whatever sits behind the backend.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::report::ReportPayload;

/// Transport backend interface
pub trait Transport: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Hand a report over for delivery
    fn send(&self, report: ReportPayload);
}

/// In-memory transport, for tests and replay
#[derive(Clone, Default)]
pub struct MemoryTransport {
    reports: Arc<Mutex<Vec<ReportPayload>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far
    pub fn reports(&self) -> Vec<ReportPayload> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Take and clear everything sent so far
    pub fn drain(&self) -> Vec<ReportPayload> {
        std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&self, report: ReportPayload) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
    }
}

/// Channel transport: hands reports to an async uploader task
pub struct ChannelTransport {
    sender: UnboundedSender<ReportPayload>,
}

impl ChannelTransport {
    /// Create the transport and the receiving end for the uploader
    pub fn new() -> (Self, UnboundedReceiver<ReportPayload>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn name(&self) -> &str {
        "channel"
    }

    fn send(&self, report: ReportPayload) {
        if let Err(err) = self.sender.send(report) {
            tracing::warn!(
                event_type = %err.0.record.event_type,
                "lz-monitor: uploader gone, dropping report"
            );
        }
    }
}

/// Transport that drops everything
pub struct NullTransport;

impl Transport for NullTransport {
    fn name(&self) -> &str {
        "null"
    }

    fn send(&self, _report: ReportPayload) {}
}

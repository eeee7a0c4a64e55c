//! Per-kind handlers: transform, record a breadcrumb, maybe report

use std::sync::PoisonError;

use serde::Serialize;

use crate::breadcrumb::BreadcrumbRecord;
use crate::dedup::signature_of;
use crate::error::MonitorResult;
use crate::event::{now_millis, CanonicalRecord, EventData, EventType, Status};
use crate::raw::{CustomEvent, ElementInfo, ErrorTarget, HttpRequest, LogEntry, RejectionEvent, RouteChange};
use crate::transform::{
    transform_click, transform_error, transform_http, transform_log, transform_rejection,
    transform_route, ErrorOutcome,
};
use crate::Monitor;

/// What a handler did with one observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandleOutcome {
    /// A breadcrumb was stored
    pub recorded: bool,

    /// A report reached the transport
    pub reported: bool,

    /// A code error was dropped as a duplicate
    pub suppressed: bool,

    /// The event went to a plugin
    pub delegated: bool,
}

impl Monitor {
    /// Error observation: resource failures and code errors are both
    /// recorded and reported, code errors through the dedup gate.
    pub fn handle_error(&self, target: &ErrorTarget) -> MonitorResult<HandleOutcome> {
        match transform_error(target) {
            ErrorOutcome::Resource(record) => {
                let recorded = self.record_breadcrumb(&record);
                let reported = self.report(record);
                Ok(HandleOutcome {
                    recorded,
                    reported,
                    ..HandleOutcome::default()
                })
            }
            ErrorOutcome::Code(record) => Ok(self.handle_code_error(record)),
        }
    }

    pub fn handle_unhandled_rejection(&self, rejection: &RejectionEvent) -> MonitorResult<HandleOutcome> {
        Ok(self.handle_code_error(transform_rejection(rejection)))
    }

    /// Completed XHR or fetch call. Only failed calls are reported.
    pub fn handle_http(&self, event_type: EventType, request: &HttpRequest) -> MonitorResult<HandleOutcome> {
        if self.options.is_collector_url(&request.url) {
            return Ok(HandleOutcome::default());
        }
        if self.options.is_filtered_url(&request.url) {
            tracing::debug!(url = %request.url, "lz-monitor: http call filtered");
            return Ok(HandleOutcome::default());
        }

        let record = transform_http(event_type, request, self.options.handle_http_status.as_ref());
        let recorded = self.record_breadcrumb(&record);
        let reported = record.status == Status::Error && self.report(record);

        Ok(HandleOutcome {
            recorded,
            reported,
            ..HandleOutcome::default()
        })
    }

    pub fn handle_history(&self, change: &RouteChange) -> MonitorResult<HandleOutcome> {
        self.handle_route(EventType::History, change)
    }

    pub fn handle_hashchange(&self, change: &RouteChange) -> MonitorResult<HandleOutcome> {
        self.handle_route(EventType::Hashchange, change)
    }

    /// Click on an element; throttled by `throttle_delay_time`
    pub fn handle_click(&self, element: &ElementInfo) -> MonitorResult<HandleOutcome> {
        if !self.accept_click(now_millis()) {
            return Ok(HandleOutcome::default());
        }

        let recorded = match transform_click(element) {
            Some(record) => self.record_breadcrumb(&record),
            None => false,
        };
        Ok(HandleOutcome {
            recorded,
            ..HandleOutcome::default()
        })
    }

    /// User-defined kind: a registered plugin takes it, otherwise it is
    /// kept as a custom breadcrumb.
    pub fn handle_custom(&self, event: &CustomEvent) -> MonitorResult<HandleOutcome> {
        let event_type = EventType::from(event.name.as_str());

        if let Some(plugin) = self.plugins.find(&event_type) {
            plugin.transform(event.data.clone(), &self.plugin_context())?;
            return Ok(HandleOutcome {
                delegated: true,
                ..HandleOutcome::default()
            });
        }

        let record = BreadcrumbRecord::new(event_type, Status::Ok, EventData::custom(event.data.clone()));
        Ok(HandleOutcome {
            recorded: self.breadcrumbs.push(record),
            ..HandleOutcome::default()
        })
    }

    pub(crate) fn handle_log(&self, entry: &LogEntry) -> MonitorResult<HandleOutcome> {
        let record = transform_log(entry);
        let recorded = self.record_breadcrumb(&record);
        let reported = self.report(record);
        Ok(HandleOutcome {
            recorded,
            reported,
            ..HandleOutcome::default()
        })
    }

    fn handle_route(&self, event_type: EventType, change: &RouteChange) -> MonitorResult<HandleOutcome> {
        let record = transform_route(event_type, change);
        Ok(HandleOutcome {
            recorded: self.record_breadcrumb(&record),
            ..HandleOutcome::default()
        })
    }

    fn handle_code_error(&self, record: CanonicalRecord) -> HandleOutcome {
        let recorded = self.record_breadcrumb(&record);

        if !self.options.repeat_code_error {
            let signature = match record.error() {
                Some(error) => signature_of(
                    &record.event_type,
                    error.message.as_deref(),
                    error.file_name.as_deref(),
                    error.column,
                ),
                None => signature_of(&record.event_type, None, None, None),
            };

            if self.dedup.has_been_seen(&signature) {
                tracing::debug!(event_type = %record.event_type, "lz-monitor: duplicate code error suppressed");
                return HandleOutcome {
                    recorded,
                    suppressed: true,
                    ..HandleOutcome::default()
                };
            }
        }

        HandleOutcome {
            recorded,
            reported: self.report(record),
            ..HandleOutcome::default()
        }
    }

    fn accept_click(&self, now: i64) -> bool {
        let delay = i64::try_from(self.options.throttle_delay_time).unwrap_or(i64::MAX);
        let mut last = self.last_click.lock().unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(previous) if delay > 0 && now.saturating_sub(previous) < delay => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    fn record_breadcrumb(&self, record: &CanonicalRecord) -> bool {
        self.breadcrumbs.push(BreadcrumbRecord::from_record(record))
    }

    fn report(&self, record: CanonicalRecord) -> bool {
        self.reporter.send(record, self.breadcrumbs.get_all())
    }
}

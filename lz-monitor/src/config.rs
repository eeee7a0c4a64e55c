//! Configuration for lz-monitor
//!
//! Options are assembled with [`OptionsBuilder`] and frozen into an
//! immutable [`MonitorOptions`]. The JSON bind step is fail-soft: a field
//! with the wrong shape is logged and skipped, the previous value stays.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::breadcrumb::{BeforePushHook, BreadcrumbRecord};
use crate::error::{MonitorError, MonitorResult};
use crate::event::{EventType, HttpRecord};
use crate::report::{BeforeReportHook, ReportPayload};
use crate::transform::http::HttpStatusPredicate;

/// Default breadcrumb capacity
pub const DEFAULT_MAX_BREADCRUMBS: usize = 20;

fn default_true() -> bool { true }

/// Per-kind capture switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSwitches {
    #[serde(default = "default_true")]
    pub xhr: bool,

    #[serde(default = "default_true")]
    pub fetch: bool,

    #[serde(default = "default_true")]
    pub click: bool,

    #[serde(default = "default_true")]
    pub history: bool,

    #[serde(default = "default_true")]
    pub hashchange: bool,

    /// Covers both code errors and resource load failures
    #[serde(default = "default_true")]
    pub error: bool,

    #[serde(default = "default_true")]
    pub unhandledrejection: bool,
}

impl Default for EventSwitches {
    fn default() -> Self {
        Self {
            xhr: true,
            fetch: true,
            click: true,
            history: true,
            hashchange: true,
            error: true,
            unhandledrejection: true,
        }
    }
}

impl EventSwitches {
    /// Whether events of this kind should be captured
    pub fn is_enabled(&self, event_type: &EventType) -> bool {
        match event_type {
            EventType::Xhr => self.xhr,
            EventType::Fetch => self.fetch,
            EventType::Click => self.click,
            EventType::History => self.history,
            EventType::Hashchange => self.hashchange,
            EventType::Error | EventType::Resource => self.error,
            EventType::UnhandledRejection => self.unhandledrejection,
            EventType::Custom | EventType::Other(_) => true,
        }
    }
}

/// Frozen monitor configuration
#[derive(Clone)]
pub struct MonitorOptions {
    /// Collector endpoint. HTTP traffic to it is never captured.
    pub dsn: String,

    /// Project key sent with every report
    pub api_key: String,

    pub user_id: Option<String>,

    /// URL of the monitored page, attached to reports
    pub page_url: String,

    /// Breadcrumb capacity
    pub max_breadcrumbs: usize,

    /// Report every occurrence of a code error instead of the first one
    pub repeat_code_error: bool,

    /// Minimum gap between two recorded clicks, in milliseconds
    pub throttle_delay_time: u64,

    /// Turn the whole monitor into a no-op
    pub disabled: bool,

    pub switches: EventSwitches,

    /// HTTP calls whose URL matches are ignored
    pub filter_xhr_url: Option<Regex>,

    pub before_push_breadcrumb: Option<BeforePushHook>,

    pub before_data_report: Option<BeforeReportHook>,

    pub handle_http_status: Option<HttpStatusPredicate>,
}

impl MonitorOptions {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// Check the options a monitor cannot start without
    pub fn validate_required(&self) -> MonitorResult<()> {
        if self.dsn.is_empty() {
            return Err(MonitorError::MissingOption("dsn"));
        }
        if self.api_key.is_empty() {
            return Err(MonitorError::MissingOption("apiKey"));
        }
        Ok(())
    }

    /// Whether a URL points at the collector itself
    pub fn is_collector_url(&self, url: &str) -> bool {
        !self.dsn.is_empty() && url.contains(&self.dsn)
    }

    /// Whether a URL is excluded by `filter_xhr_url`
    pub fn is_filtered_url(&self, url: &str) -> bool {
        self.filter_xhr_url
            .as_ref()
            .map(|re| re.is_match(url))
            .unwrap_or(false)
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        OptionsBuilder::new().build()
    }
}

impl fmt::Debug for MonitorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorOptions")
            .field("dsn", &self.dsn)
            .field("api_key", &self.api_key)
            .field("user_id", &self.user_id)
            .field("page_url", &self.page_url)
            .field("max_breadcrumbs", &self.max_breadcrumbs)
            .field("repeat_code_error", &self.repeat_code_error)
            .field("throttle_delay_time", &self.throttle_delay_time)
            .field("disabled", &self.disabled)
            .field("switches", &self.switches)
            .field("filter_xhr_url", &self.filter_xhr_url.as_ref().map(Regex::as_str))
            .field("before_push_breadcrumb", &self.before_push_breadcrumb.is_some())
            .field("before_data_report", &self.before_data_report.is_some())
            .field("handle_http_status", &self.handle_http_status.is_some())
            .finish()
    }
}

/// Builder for [`MonitorOptions`]
#[derive(Clone)]
pub struct OptionsBuilder {
    options: MonitorOptions,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: MonitorOptions {
                dsn: String::new(),
                api_key: String::new(),
                user_id: None,
                page_url: String::new(),
                max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
                repeat_code_error: false,
                throttle_delay_time: 0,
                disabled: false,
                switches: EventSwitches::default(),
                filter_xhr_url: None,
                before_push_breadcrumb: None,
                before_data_report: None,
                handle_http_status: None,
            },
        }
    }

    pub fn dsn(mut self, dsn: impl Into<String>) -> Self {
        self.options.dsn = dsn.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.options.api_key = api_key.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.options.user_id = Some(user_id.into());
        self
    }

    pub fn page_url(mut self, page_url: impl Into<String>) -> Self {
        self.options.page_url = page_url.into();
        self
    }

    /// Set the breadcrumb capacity; zero restores the default
    pub fn max_breadcrumbs(mut self, max: usize) -> Self {
        self.options.max_breadcrumbs = if max == 0 { DEFAULT_MAX_BREADCRUMBS } else { max };
        self
    }

    pub fn repeat_code_error(mut self, repeat: bool) -> Self {
        self.options.repeat_code_error = repeat;
        self
    }

    pub fn throttle_delay_time(mut self, millis: u64) -> Self {
        self.options.throttle_delay_time = millis;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.options.disabled = disabled;
        self
    }

    pub fn switches(mut self, switches: EventSwitches) -> Self {
        self.options.switches = switches;
        self
    }

    pub fn filter_xhr_url(mut self, pattern: Regex) -> Self {
        self.options.filter_xhr_url = Some(pattern);
        self
    }

    /// Hook run before every breadcrumb insert; returning `None` vetoes it
    pub fn before_push_breadcrumb<F>(mut self, hook: F) -> Self
    where
        F: Fn(BreadcrumbRecord) -> Option<BreadcrumbRecord> + Send + Sync + 'static,
    {
        self.options.before_push_breadcrumb = Some(Arc::new(hook));
        self
    }

    /// Hook run on every outgoing report; returning `None` drops it
    pub fn before_data_report<F>(mut self, hook: F) -> Self
    where
        F: Fn(ReportPayload) -> Option<ReportPayload> + Send + Sync + 'static,
    {
        self.options.before_data_report = Some(Arc::new(hook));
        self
    }

    /// Predicate deciding whether a completed HTTP call counts as ok
    pub fn handle_http_status<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HttpRecord) -> bool + Send + Sync + 'static,
    {
        self.options.handle_http_status = Some(Arc::new(predicate));
        self
    }

    /// Bind options from a JSON object, field by field.
    ///
    /// Every rejected field is logged and returned; accepted fields are
    /// applied. Callable options are always rejected here since JSON cannot
    /// carry them.
    pub fn bind_json(&mut self, value: &Value) -> Vec<MonitorError> {
        let mut rejected = Vec::new();

        let object = match value {
            Value::Object(map) => map,
            other => {
                rejected.push(reject("options", "object", other));
                return rejected;
            }
        };

        for (name, field) in object {
            let opts = &mut self.options;
            let outcome = match name.as_str() {
                "dsn" => expect_string(name, field).map(|v| opts.dsn = v),
                "apiKey" => expect_string(name, field).map(|v| opts.api_key = v),
                "userId" => expect_string(name, field).map(|v| opts.user_id = Some(v)),
                "pageUrl" => expect_string(name, field).map(|v| opts.page_url = v),
                "maxBreadcrumbs" => expect_count(name, field).map(|v| {
                    opts.max_breadcrumbs = if v == 0 { DEFAULT_MAX_BREADCRUMBS } else { v as usize };
                }),
                "repeatCodeError" => expect_bool(name, field).map(|v| opts.repeat_code_error = v),
                "throttleDelayTime" => {
                    expect_count(name, field).map(|v| opts.throttle_delay_time = v)
                }
                "disabled" => expect_bool(name, field).map(|v| opts.disabled = v),
                "filterXhrUrlRegExp" => expect_regex(name, field).map(|v| opts.filter_xhr_url = Some(v)),
                "enableXhr" => expect_bool(name, field).map(|v| opts.switches.xhr = v),
                "enableFetch" => expect_bool(name, field).map(|v| opts.switches.fetch = v),
                "enableClick" => expect_bool(name, field).map(|v| opts.switches.click = v),
                "enableHistory" => expect_bool(name, field).map(|v| opts.switches.history = v),
                "enableHashchange" => expect_bool(name, field).map(|v| opts.switches.hashchange = v),
                "enableError" => expect_bool(name, field).map(|v| opts.switches.error = v),
                "enableUnhandledrejection" => {
                    expect_bool(name, field).map(|v| opts.switches.unhandledrejection = v)
                }
                "beforePushBreadcrumb" | "beforeDataReport" | "handleHttpStatus" => {
                    Err(reject(name, "function", field))
                }
                _ => {
                    tracing::debug!(option = %name, "lz-monitor: ignoring unknown option");
                    Ok(())
                }
            };

            if let Err(err) = outcome {
                rejected.push(err);
            }
        }

        rejected
    }

    /// Chaining form of [`OptionsBuilder::bind_json`]
    pub fn with_json(mut self, value: &Value) -> Self {
        self.bind_json(value);
        self
    }

    pub fn build(self) -> MonitorOptions {
        self.options
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn reject(name: &str, expected: &'static str, actual: &Value) -> MonitorError {
    let err = MonitorError::InvalidOption {
        name: name.to_string(),
        expected,
        actual: json_type_name(actual).to_string(),
    };
    tracing::error!(option = %name, "lz-monitor: {}", err);
    err
}

fn expect_string(name: &str, value: &Value) -> MonitorResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| reject(name, "string", value))
}

fn expect_bool(name: &str, value: &Value) -> MonitorResult<bool> {
    value.as_bool().ok_or_else(|| reject(name, "boolean", value))
}

fn expect_count(name: &str, value: &Value) -> MonitorResult<u64> {
    value
        .as_u64()
        .ok_or_else(|| reject(name, "non-negative integer", value))
}

fn expect_regex(name: &str, value: &Value) -> MonitorResult<Regex> {
    let pattern = value.as_str().ok_or_else(|| reject(name, "regexp", value))?;
    Regex::new(pattern).map_err(|e| {
        let err = MonitorError::InvalidOption {
            name: name.to_string(),
            expected: "regexp",
            actual: e.to_string(),
        };
        tracing::error!(option = %name, "lz-monitor: {}", err);
        err
    })
}

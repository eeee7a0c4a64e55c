//! Plugin mechanism for user-defined event kinds

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::breadcrumb::{BreadcrumbRecord, BreadcrumbStore};
use crate::config::MonitorOptions;
use crate::error::MonitorResult;
use crate::event::{CanonicalRecord, EventType};
use crate::report::Reporter;

/// Capabilities handed to a plugin
pub struct PluginContext<'a> {
    pub reporter: &'a Reporter,
    pub breadcrumbs: &'a BreadcrumbStore,
    pub options: &'a MonitorOptions,
}

impl PluginContext<'_> {
    /// Send a record with the current breadcrumb history attached
    pub fn send(&self, record: CanonicalRecord) -> bool {
        self.reporter.send(record, self.breadcrumbs.get_all())
    }

    /// Record a breadcrumb through the configured hook
    pub fn push_breadcrumb(&self, record: BreadcrumbRecord) -> bool {
        self.breadcrumbs.push(record)
    }
}

/// A user-registered extension owning one event kind
pub trait MonitorPlugin: Send + Sync {
    /// Event kind this plugin handles
    fn event_type(&self) -> EventType;

    /// Called once at registration
    fn setup(&self, _ctx: &PluginContext<'_>) -> MonitorResult<()> {
        Ok(())
    }

    /// Called for every event of the plugin's kind
    fn transform(&self, data: Value, ctx: &PluginContext<'_>) -> MonitorResult<()>;
}

/// Registry of plugins, one per event kind
pub struct PluginRegistry {
    plugins: RwLock<Vec<Arc<dyn MonitorPlugin>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(Vec::new()),
        }
    }

    /// Register a plugin. Fails if its kind is already claimed.
    pub fn register(&self, plugin: Arc<dyn MonitorPlugin>) -> bool {
        let mut plugins = self.plugins.write().unwrap_or_else(PoisonError::into_inner);
        let event_type = plugin.event_type();
        if plugins.iter().any(|p| p.event_type() == event_type) {
            tracing::warn!(event_type = %event_type, "lz-monitor: plugin kind already registered");
            return false;
        }
        plugins.push(plugin);
        true
    }

    /// Plugin owning `event_type`, if any
    pub fn find(&self, event_type: &EventType) -> Option<Arc<dyn MonitorPlugin>> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| &p.event_type() == event_type)
            .cloned()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

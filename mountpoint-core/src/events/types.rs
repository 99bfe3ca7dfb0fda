//! Event type definitions

use serde::{Deserialize, Serialize};

/// Events on the shared host event bus.
///
/// The renderer consumes the three lifecycle events and emits `Toast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The store now holds a plugin to mount
    PluginActivated,

    /// The active plugin should be unmounted
    PluginDeactivated,

    /// The store's search query changed
    SearchUpdated,

    /// A user notification, payload passed through unchanged
    Toast { detail: serde_json::Value },
}

impl HostEvent {
    /// Stable snake_case name, matching the serialized tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PluginActivated => "plugin_activated",
            Self::PluginDeactivated => "plugin_deactivated",
            Self::SearchUpdated => "search_updated",
            Self::Toast { .. } => "toast",
        }
    }

    /// Whether the renderer drives its lifecycle from this event
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::Toast { .. })
    }
}

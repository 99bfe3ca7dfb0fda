//! Application store - what the renderer reads when an event fires
//!
//! The renderer never caches store values between events. Each lifecycle
//! handler receives a fresh [`StoreSnapshot`], so swapping the active plugin
//! in the store takes effect on the next event.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use mountpoint_plugin_api::{Plugin, PluginData};

/// Point-in-time view of the application store
#[derive(Clone, Default)]
pub struct StoreSnapshot {
    /// Currently selected plugin implementation
    pub active_plugin: Option<Arc<dyn Plugin>>,
    /// Payload handed to `decorate`
    pub plugin_data: PluginData,
    /// Source path of the active plugin module
    pub active_plugin_path: String,
    /// Current search query
    pub search_query: String,
}

impl fmt::Debug for StoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSnapshot")
            .field("active_plugin", &self.active_plugin.as_ref().map(|p| p.name()))
            .field("plugin_data", &self.plugin_data)
            .field("active_plugin_path", &self.active_plugin_path)
            .field("search_query", &self.search_query)
            .finish()
    }
}

/// Read-only access to the application store
pub trait AppStore: Send + Sync {
    /// Current values, read at the moment an event is handled
    fn snapshot(&self) -> StoreSnapshot;
}

/// In-memory store with setters for the host shell
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<StoreSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, f: impl FnOnce(&mut StoreSnapshot)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Select a plugin along with its data and source path
    pub fn set_active_plugin(
        &self,
        plugin: Arc<dyn Plugin>,
        data: PluginData,
        path: impl Into<String>,
    ) {
        let path = path.into();
        self.update(|s| {
            s.active_plugin = Some(plugin);
            s.plugin_data = data;
            s.active_plugin_path = path;
        });
    }

    /// Forget the active plugin, its data and path
    pub fn clear_active_plugin(&self) {
        self.update(|s| {
            s.active_plugin = None;
            s.plugin_data = PluginData::Null;
            s.active_plugin_path.clear();
        });
    }

    pub fn set_plugin_data(&self, data: PluginData) {
        self.update(|s| s.plugin_data = data);
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|s| s.search_query = query);
    }
}

impl AppStore for MemoryStore {
    fn snapshot(&self) -> StoreSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

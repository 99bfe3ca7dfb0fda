//! mountpoint-core: Core library for the mountpoint plugin renderer
//!
//! This crate mounts exactly one active plugin into a host surface and keeps
//! it in step with the host's event bus:
//!
//! - **Event system** - [`EventBus`] trait and [`MemoryEventBus`] carrying typed [`HostEvent`]s
//! - **Store** - [`AppStore`] snapshots of the active plugin, its data, path and search query
//! - **Mount surface** - [`MountSurface`] owning the container, stylesheet links and loader
//! - **Lifecycle listener** - [`PluginRenderer`] translating bus events into surface changes
//! - **Configuration** - [`RendererConfig`] with layered TOML loading
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use mountpoint_core::{HostEvent, MemoryEventBus, MemoryStore, PluginRenderer, RendererConfig};
//!
//! let config = RendererConfig::default();
//! let bus = Arc::new(MemoryEventBus::new(config.bus.capacity));
//! let store = MemoryStore::new();
//! store.set_active_plugin(Arc::new(MyPlugin), serde_json::json!({}), "plugins/my/my.js");
//!
//! let mut renderer = PluginRenderer::new(&config, bus.clone());
//! renderer.render();
//! renderer.handle_event(&HostEvent::PluginActivated, &store)?;
//! renderer.drain_requests();
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  PluginActivated / PluginDeactivated / SearchUpdated
//! │   EventBus   │──────────────────────────────┐
//! └──────▲───────┘                              ▼
//!        │ Toast                     ┌────────────────────┐   snapshot()  ┌──────────┐
//!        │                           │   PluginRenderer   │──────────────▶│ AppStore │
//!        │                           └─────────┬──────────┘               └──────────┘
//!        │                                     │ create / clear / remove
//!        │                           ┌─────────▼──────────┐
//!        └───────────────────────────│    MountSurface    │
//!                                    │ stylesheet links   │
//!                                    │ container ◀── decorate() ── Plugin
//!                                    │ loader             │
//!                                    └────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod renderer;
pub mod store;
pub mod surface;

// Re-export key types for convenience
pub use config::{ActivationPolicy, RawRendererConfig, RendererConfig};
pub use error::{ConfigError, RendererError};
pub use events::{EventBus, EventSeq, HostEvent, MemoryEventBus};
pub use renderer::PluginRenderer;
pub use store::{AppStore, MemoryStore, StoreSnapshot};
pub use surface::{
    LoaderSurface, MountSurface, NodeSnapshot, StylesheetLink, SurfaceSnapshot,
    derive_stylesheet_href,
};

pub use mountpoint_plugin_api as plugin_api;

//! mountpoint-plugin-api - Plugin API for the mountpoint plugin renderer
//!
//! This crate provides the trait and types needed to write a plugin that the
//! mountpoint host can mount. A plugin is handed a [`Container`] and populates
//! it with [`Element`]s. While it works it may ask the host to show or hide the
//! loading indicator, or to surface a notification to the user.
//!
//! # Example
//!
//! ```ignore
//! use mountpoint_plugin_api::{Container, Element, Plugin, PluginData, PluginError};
//!
//! pub struct Greeter;
//!
//! impl Plugin for Greeter {
//!     fn name(&self) -> &str {
//!         "greeter"
//!     }
//!
//!     fn decorate(
//!         &self,
//!         container: &Container,
//!         data: &PluginData,
//!         search_query: Option<&str>,
//!     ) -> Result<(), PluginError> {
//!         container.display_loader();
//!         let who = data["name"].as_str().unwrap_or("world");
//!         container.append(Element::new("p").text(format!("hello {who}")));
//!         container.hide_loader();
//!         Ok(())
//!     }
//! }
//! ```

pub mod container;
pub mod error;
pub mod types;

pub use container::{Container, ContainerId, ContainerRequest, ScopedRequest};
pub use error::PluginError;
pub use types::{Element, PluginData};

/// The plugin trait - implement this to render into a mountpoint host.
///
/// The host keeps the active plugin behind an `Arc` and calls [`Plugin::decorate`]
/// once when the plugin is activated and again every time the search query
/// changes. Between search updates the host clears the container, so a plugin
/// always renders into an empty container.
pub trait Plugin: Send + Sync {
    /// Name used in host logs
    fn name(&self) -> &str {
        "plugin"
    }

    /// Populate `container` from `data`.
    ///
    /// `search_query` is `None` on the initial mount and `Some` on every
    /// re-decoration triggered by a search update.
    fn decorate(
        &self,
        container: &Container,
        data: &PluginData,
        search_query: Option<&str>,
    ) -> Result<(), PluginError>;
}

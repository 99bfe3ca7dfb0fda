//! Error types for mountpoint-core
//!
//! Missing containers and unrendered loader surfaces are not errors; the
//! renderer treats them as no-ops. What remains is a plugin that cannot be
//! found or fails to render, and configuration that cannot be read.

use thiserror::Error;

use mountpoint_plugin_api::PluginError;

/// Errors from handling a lifecycle event
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("No active plugin in store")]
    NoActivePlugin,

    #[error("Plugin '{plugin}' failed to decorate: {source}")]
    Decorate {
        plugin: String,
        #[source]
        source: PluginError,
    },
}

/// Errors from loading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

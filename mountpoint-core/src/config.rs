//! Renderer configuration
//!
//! Two shapes, as in every layered config: [`RawRendererConfig`] mirrors a TOML
//! file with every field optional so layers can be merged, and
//! [`RendererConfig`] is the final value with defaults applied.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::events::memory::DEFAULT_CAPACITY;

/// Default container marker (class and test id of the mount container)
pub const DEFAULT_MARKER: &str = "plugin-root";
/// Default suffix of plugin module paths
pub const DEFAULT_MODULE_SUFFIX: &str = ".js";
/// Default suffix of plugin stylesheets
pub const DEFAULT_STYLESHEET_SUFFIX: &str = ".css";

/// What to do when a plugin is activated while a container is still mounted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPolicy {
    /// Unmount the previous container first
    #[default]
    Replace,
    /// Mount another container on top of the existing one
    Stack,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub container: ContainerConfig,

    #[serde(default)]
    pub bus: BusConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylesheetConfig {
    /// Suffix replaced in the plugin path
    pub module_suffix: String,
    /// Replacement suffix yielding the stylesheet href
    pub stylesheet_suffix: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            module_suffix: DEFAULT_MODULE_SUFFIX.to_string(),
            stylesheet_suffix: DEFAULT_STYLESHEET_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Marker the surface uses to find the mount container
    pub marker: String,
    pub on_duplicate_activation: ActivationPolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            on_duplicate_activation: ActivationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Broadcast capacity of the in-memory bus
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRendererConfig {
    #[serde(default)]
    pub stylesheet: RawStylesheetConfig,

    #[serde(default)]
    pub container: RawContainerConfig,

    #[serde(default)]
    pub bus: RawBusConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStylesheetConfig {
    pub module_suffix: Option<String>,
    pub stylesheet_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContainerConfig {
    pub marker: Option<String>,
    pub on_duplicate_activation: Option<ActivationPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBusConfig {
    pub capacity: Option<usize>,
}

impl RawRendererConfig {
    /// Read a config layer. Returns `None` if the file doesn't exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&contents)?))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    pub fn merge(self, overlay: RawRendererConfig) -> RawRendererConfig {
        RawRendererConfig {
            stylesheet: RawStylesheetConfig {
                module_suffix: overlay
                    .stylesheet
                    .module_suffix
                    .or(self.stylesheet.module_suffix),
                stylesheet_suffix: overlay
                    .stylesheet
                    .stylesheet_suffix
                    .or(self.stylesheet.stylesheet_suffix),
            },
            container: RawContainerConfig {
                marker: overlay.container.marker.or(self.container.marker),
                on_duplicate_activation: overlay
                    .container
                    .on_duplicate_activation
                    .or(self.container.on_duplicate_activation),
            },
            bus: RawBusConfig {
                capacity: overlay.bus.capacity.or(self.bus.capacity),
            },
        }
    }

    /// Apply defaults for everything left unset
    pub fn finalize(self) -> RendererConfig {
        let defaults = RendererConfig::default();
        RendererConfig {
            stylesheet: StylesheetConfig {
                module_suffix: self
                    .stylesheet
                    .module_suffix
                    .unwrap_or(defaults.stylesheet.module_suffix),
                stylesheet_suffix: self
                    .stylesheet
                    .stylesheet_suffix
                    .unwrap_or(defaults.stylesheet.stylesheet_suffix),
            },
            container: ContainerConfig {
                marker: self.container.marker.unwrap_or(defaults.container.marker),
                on_duplicate_activation: self
                    .container
                    .on_duplicate_activation
                    .unwrap_or(defaults.container.on_duplicate_activation),
            },
            bus: BusConfig {
                capacity: self.bus.capacity.unwrap_or(defaults.bus.capacity),
            },
        }
    }
}

impl RendererConfig {
    /// Load and merge config layers in order; later layers win.
    ///
    /// Missing files are skipped.
    pub fn load_layers<'a>(
        layers: impl IntoIterator<Item = &'a Path>,
    ) -> Result<RendererConfig, ConfigError> {
        let mut raw = RawRendererConfig::default();
        for path in layers {
            if let Some(layer) = RawRendererConfig::from_file(path)? {
                tracing::debug!(path = %path.display(), "Loaded config layer");
                raw = raw.merge(layer);
            }
        }
        Ok(raw.finalize())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

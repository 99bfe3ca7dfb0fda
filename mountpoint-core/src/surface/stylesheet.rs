//! Stylesheet links derived from the active plugin's path

use serde::{Deserialize, Serialize};

use crate::config::StylesheetConfig;

/// A `rel="stylesheet"` reference node on the render surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesheetLink {
    pub rel: String,
    pub href: String,
}

impl StylesheetLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            rel: "stylesheet".to_string(),
            href: href.into(),
        }
    }
}

/// Derive a stylesheet href from a plugin module path.
///
/// Replaces the first occurrence of `module_suffix` with `stylesheet_suffix`.
/// Total: a path without the suffix comes back unchanged. Nothing is checked
/// against the filesystem or network.
pub fn derive_stylesheet_href(path: &str, config: &StylesheetConfig) -> String {
    if config.module_suffix.is_empty() {
        return path.to_string();
    }
    path.replacen(&config.module_suffix, &config.stylesheet_suffix, 1)
}

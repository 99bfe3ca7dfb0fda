//! Loader surface - the progress indicator shown while a plugin works

use serde::{Deserialize, Serialize};

/// Accessible label of the indicator
pub const LOADER_LABEL: &str = "loading plugin";

/// Fixed indicator, independent of any mount container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSurface {
    pub label: String,
    pub visible: bool,
}

impl Default for LoaderSurface {
    fn default() -> Self {
        Self {
            label: LOADER_LABEL.to_string(),
            visible: false,
        }
    }
}

impl LoaderSurface {
    /// Returns whether visibility changed
    pub fn show(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    /// Returns whether visibility changed
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}

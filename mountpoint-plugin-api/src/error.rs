//! Error types for plugin authors

use thiserror::Error;

/// Errors that plugins can return from `decorate`
#[derive(Error, Debug)]
pub enum PluginError {
    /// Rendering into the container failed
    #[error("Render failed: {0}")]
    Render(String),

    /// The plugin data payload did not have the expected shape
    #[error("Invalid plugin data: {0}")]
    InvalidData(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

impl PluginError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }
}

//! Replay scripts - a scripted sequence of store changes and bus events
//!
//! ```toml
//! path = "plugins/list/list.js"
//! data = { items = ["apple", "banana"] }
//!
//! [[step]]
//! event = { type = "plugin_activated" }
//!
//! [[step]]
//! query = "an"
//! event = { type = "search_updated" }
//! ```
//!
//! Within a step, store changes (`query`, `data`) are applied before
//! the event is published.

use anyhow::{Context, Result, bail};
use mountpoint_core::HostEvent;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    /// Initial plugin source path
    pub path: String,

    /// Initial plugin data
    #[serde(default)]
    pub data: serde_json::Value,

    /// Initial search query
    #[serde(default)]
    pub query: String,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step {
    pub query: Option<String>,
    pub data: Option<serde_json::Value>,
    pub event: Option<HostEvent>,
}

impl Step {
    fn is_empty(&self) -> bool {
        self.query.is_none() && self.data.is_none() && self.event.is_none()
    }
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let script: Self = toml::from_str(contents)?;
        if let Some(index) = script.steps.iter().position(Step::is_empty) {
            bail!("step {} does nothing", index + 1);
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_steps_in_order() {
        let script = ReplayScript::parse(
            r#"
path = "plugins/list/list.js"
data = { items = ["apple", "banana"] }

[[step]]
event = { type = "plugin_activated" }

[[step]]
query = "an"
event = { type = "search_updated" }

[[step]]
event = { type = "toast", detail = { message = "saved" } }
"#,
        )
        .unwrap();

        assert_eq!(script.path, "plugins/list/list.js");
        assert_eq!(script.data, json!({"items": ["apple", "banana"]}));
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0].event, Some(HostEvent::PluginActivated));
        assert_eq!(script.steps[1].query.as_deref(), Some("an"));
        assert_eq!(
            script.steps[2].event,
            Some(HostEvent::Toast {
                detail: json!({"message": "saved"})
            })
        );
    }

    #[test]
    fn data_and_steps_are_optional() {
        let script = ReplayScript::parse("path = \"x.js\"").unwrap();
        assert_eq!(script.data, serde_json::Value::Null);
        assert!(script.query.is_empty());
        assert!(script.steps.is_empty());
    }

    #[test]
    fn rejects_empty_step() {
        let err = ReplayScript::parse("path = \"x.js\"\n[[step]]\n").unwrap_err();
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn rejects_unknown_event_type() {
        assert!(
            ReplayScript::parse("path = \"x.js\"\n[[step]]\nevent = { type = \"explode\" }\n")
                .is_err()
        );
    }

    #[test]
    fn missing_file_is_error() {
        assert!(ReplayScript::load(Path::new("/nonexistent/script.toml")).is_err());
    }
}

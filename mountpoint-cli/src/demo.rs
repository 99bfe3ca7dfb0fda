//! Built-in plugins for replaying sessions without a real plugin

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::ValueEnum;
use mountpoint_plugin_api::{Container, Element, Plugin, PluginData, PluginError};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoPlugin {
    /// Render `data.items` as a list filtered by the search query
    List,
    /// Render the data payload and search query verbatim
    Echo,
    /// Toast on every decoration
    Noisy,
}

impl DemoPlugin {
    pub fn build(self) -> Arc<dyn Plugin> {
        match self {
            Self::List => Arc::new(ListPlugin),
            Self::Echo => Arc::new(EchoPlugin),
            Self::Noisy => Arc::new(NoisyPlugin::default()),
        }
    }
}

pub struct ListPlugin;

impl Plugin for ListPlugin {
    fn name(&self) -> &str {
        "list"
    }

    fn decorate(
        &self,
        container: &Container,
        data: &PluginData,
        search_query: Option<&str>,
    ) -> Result<(), PluginError> {
        container.display_loader();

        let items = data
            .get("items")
            .and_then(|items| items.as_array())
            .ok_or_else(|| PluginError::invalid_data("expected `items` array"))?;

        let query = search_query.unwrap_or_default().to_lowercase();
        let mut list = Element::new("ul").attr("class", "results");
        let mut matched = 0;
        for item in items {
            let text = match item.as_str() {
                Some(s) => s.to_string(),
                None => item.to_string(),
            };
            if text.to_lowercase().contains(&query) {
                list = list.child(Element::new("li").text(text));
                matched += 1;
            }
        }

        if matched == 0 {
            container.append(Element::new("p").attr("class", "empty").text("No results"));
        } else {
            container.append(list);
        }

        container.hide_loader();
        Ok(())
    }
}

pub struct EchoPlugin;

impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        "echo"
    }

    fn decorate(
        &self,
        container: &Container,
        data: &PluginData,
        search_query: Option<&str>,
    ) -> Result<(), PluginError> {
        container.append(Element::new("pre").text(serde_json::to_string_pretty(data)?));
        if let Some(query) = search_query {
            container.append(Element::new("p").attr("class", "query").text(query));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct NoisyPlugin {
    decorations: AtomicUsize,
}

impl Plugin for NoisyPlugin {
    fn name(&self) -> &str {
        "noisy"
    }

    fn decorate(
        &self,
        container: &Container,
        _data: &PluginData,
        search_query: Option<&str>,
    ) -> Result<(), PluginError> {
        let count = self.decorations.fetch_add(1, Ordering::SeqCst) + 1;
        container.append(Element::new("p").text(format!("decoration #{count}")));
        container.toast(json!({
            "message": format!("decorated {count} time(s)"),
            "query": search_query,
        }));
        Ok(())
    }
}

//! Mount surface - the render root the active plugin is mounted into
//!
//! The surface owns an ordered list of nodes (stylesheet links and mount
//! containers, newest first) and the loader indicator. Containers are found by
//! their marker rather than by a held reference, and every operation that
//! expects something to be mounted quietly does nothing when it isn't.

pub mod loader;
pub mod stylesheet;

use serde::Serialize;
use std::sync::Arc;

use mountpoint_plugin_api::{Container, ContainerId, Element};

use crate::config::{RendererConfig, StylesheetConfig};
use crate::events::{EventBus, EventSeq, HostEvent};

pub use loader::LoaderSurface;
pub use stylesheet::{StylesheetLink, derive_stylesheet_href};

/// A node directly under the render root
#[derive(Debug, Clone, PartialEq)]
enum SurfaceNode {
    Stylesheet(StylesheetLink),
    Container(Container),
}

/// Serializable view of the surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub loader: Option<LoaderSurface>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Stylesheet {
        rel: String,
        href: String,
    },
    Container {
        id: ContainerId,
        marker: String,
        children: Vec<Element>,
    },
}

/// Owns the mount container(s), stylesheet links and loader surface
pub struct MountSurface {
    nodes: Vec<SurfaceNode>,
    loader: Option<LoaderSurface>,
    marker: String,
    stylesheet: StylesheetConfig,
    bus: Arc<dyn EventBus>,
}

impl MountSurface {
    pub fn new(config: &RendererConfig, bus: Arc<dyn EventBus>) -> Self {
        Self {
            nodes: Vec::new(),
            loader: None,
            marker: config.container.marker.clone(),
            stylesheet: config.stylesheet.clone(),
            bus,
        }
    }

    /// Render the fixed parts of the surface (the loader). Idempotent.
    pub fn render(&mut self) {
        if self.loader.is_none() {
            self.loader = Some(LoaderSurface::default());
        }
    }

    // ─── Container ───────────────────────────────────────────────────

    /// Create an empty container and insert it as the first node
    pub fn create_container(&mut self) -> Container {
        let container = Container::new(self.marker.clone());
        self.nodes
            .insert(0, SurfaceNode::Container(container.clone()));
        tracing::debug!(container = %container.id(), marker = %self.marker, "Container created");
        container
    }

    /// First container carrying the marker, in surface order
    pub fn current_container(&self) -> Option<&Container> {
        self.containers().find(|c| c.marker() == self.marker)
    }

    /// Detach the current container. No-op if none is mounted.
    ///
    /// The container's request listener is detached with it.
    pub fn remove_container(&mut self) -> Option<Container> {
        let index = self.nodes.iter().position(|node| {
            matches!(node, SurfaceNode::Container(c) if c.marker() == self.marker)
        });
        let Some(index) = index else {
            tracing::debug!("No container mounted, nothing to remove");
            return None;
        };
        match self.nodes.remove(index) {
            SurfaceNode::Container(container) => {
                container.detach();
                tracing::debug!(container = %container.id(), "Container removed");
                Some(container)
            }
            SurfaceNode::Stylesheet(_) => None,
        }
    }

    /// Remove all of the container's content in place
    pub fn clear_container(&self, container: &Container) {
        container.clear();
    }

    /// Whether a container with this id is mounted
    pub fn is_mounted(&self, id: ContainerId) -> bool {
        self.containers().any(|c| c.id() == id)
    }

    pub fn container_count(&self) -> usize {
        self.containers().count()
    }

    fn containers(&self) -> impl Iterator<Item = &Container> {
        self.nodes.iter().filter_map(|node| match node {
            SurfaceNode::Container(c) => Some(c),
            SurfaceNode::Stylesheet(_) => None,
        })
    }

    // ─── Stylesheet ──────────────────────────────────────────────────

    /// Insert a stylesheet link derived from `path` as the first node
    pub fn attach_stylesheet(&mut self, path: &str) -> StylesheetLink {
        let link = StylesheetLink::new(derive_stylesheet_href(path, &self.stylesheet));
        tracing::debug!(href = %link.href, "Stylesheet attached");
        self.nodes.insert(0, SurfaceNode::Stylesheet(link.clone()));
        link
    }

    pub fn stylesheets(&self) -> Vec<&StylesheetLink> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                SurfaceNode::Stylesheet(link) => Some(link),
                SurfaceNode::Container(_) => None,
            })
            .collect()
    }

    // ─── Loader ──────────────────────────────────────────────────────

    pub fn show_loader(&mut self) {
        match self.loader.as_mut() {
            Some(loader) => {
                if loader.show() {
                    tracing::debug!("Loader shown");
                }
            }
            None => tracing::debug!("Loader surface not rendered, ignoring show"),
        }
    }

    pub fn hide_loader(&mut self) {
        match self.loader.as_mut() {
            Some(loader) => {
                if loader.hide() {
                    tracing::debug!("Loader hidden");
                }
            }
            None => tracing::debug!("Loader surface not rendered, ignoring hide"),
        }
    }

    /// `false` when hidden or not rendered
    pub fn loader_visible(&self) -> bool {
        self.loader.as_ref().is_some_and(|l| l.visible)
    }

    // ─── Notifications ───────────────────────────────────────────────

    /// Re-emit a toast on the shared bus with its payload unchanged
    pub fn forward_toast(&self, detail: serde_json::Value) -> EventSeq {
        self.bus.publish(HostEvent::Toast { detail })
    }

    // ─── Inspection ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|node| match node {
                SurfaceNode::Stylesheet(link) => NodeSnapshot::Stylesheet {
                    rel: link.rel.clone(),
                    href: link.href.clone(),
                },
                SurfaceNode::Container(c) => NodeSnapshot::Container {
                    id: c.id(),
                    marker: c.marker().to_string(),
                    children: c.children(),
                },
            })
            .collect();
        SurfaceSnapshot {
            nodes,
            loader: self.loader.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventBus;
    use serde_json::json;

    fn surface() -> (MountSurface, Arc<MemoryEventBus>) {
        let bus = Arc::new(MemoryEventBus::new(16));
        let surface = MountSurface::new(&RendererConfig::default(), bus.clone());
        (surface, bus)
    }

    #[test]
    fn test_create_container_is_first_and_tagged() {
        let (mut surface, _) = surface();
        surface.attach_stylesheet("old.js");
        let container = surface.create_container();

        assert_eq!(surface.nodes[0], SurfaceNode::Container(container.clone()));
        assert_eq!(container.marker(), "plugin-root");
        assert!(container.is_empty());
    }

    #[test]
    fn test_stylesheet_goes_ahead_of_container() {
        let (mut surface, _) = surface();
        let container = surface.create_container();
        let link = surface.attach_stylesheet("plugins/foo/foo.js");

        assert_eq!(link.href, "plugins/foo/foo.css");
        assert_eq!(surface.nodes[0], SurfaceNode::Stylesheet(link));
        assert_eq!(surface.nodes[1], SurfaceNode::Container(container));
    }

    #[test]
    fn test_current_container_found_by_marker() {
        let (mut surface, _) = surface();
        assert!(surface.current_container().is_none());

        let container = surface.create_container();
        assert_eq!(surface.current_container(), Some(&container));
    }

    #[test]
    fn test_remove_container_detaches_it() {
        let (mut surface, _) = surface();
        let container = surface.create_container();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        container.listen(tx);

        let removed = surface.remove_container().unwrap();

        assert_eq!(removed, container);
        assert!(!removed.is_listening());
        assert_eq!(surface.container_count(), 0);
        assert!(!surface.is_mounted(container.id()));
    }

    #[test]
    fn test_remove_container_keeps_stylesheet() {
        let (mut surface, _) = surface();
        surface.create_container();
        surface.attach_stylesheet("a.js");

        surface.remove_container();

        assert_eq!(surface.stylesheets().len(), 1);
    }

    #[test]
    fn test_remove_without_container_is_noop() {
        let (mut surface, _) = surface();
        surface.attach_stylesheet("a.js");
        let before = surface.snapshot();

        assert!(surface.remove_container().is_none());
        assert_eq!(surface.snapshot(), before);
    }

    #[test]
    fn test_remove_ignores_foreign_marker() {
        let (mut surface, _) = surface();
        let own = surface.create_container();
        let foreign = Container::new("other-root");
        surface
            .nodes
            .insert(0, SurfaceNode::Container(foreign.clone()));

        assert_eq!(surface.current_container(), Some(&own));
        assert_eq!(surface.remove_container(), Some(own));
        assert_eq!(surface.remove_container(), None);

        assert_eq!(surface.container_count(), 1);
        assert!(surface.is_mounted(foreign.id()));
        assert_eq!(surface.nodes, vec![SurfaceNode::Container(foreign)]);
    }

    #[test]
    fn test_custom_marker_is_used_for_new_containers() {
        let bus = Arc::new(MemoryEventBus::new(16));
        let mut config = RendererConfig::default();
        config.container.marker = "custom-root".to_string();
        let mut surface = MountSurface::new(&config, bus);

        let container = surface.create_container();
        assert_eq!(container.marker(), "custom-root");
        assert_eq!(surface.remove_container(), Some(container));
    }

    #[test]
    fn test_clear_container_keeps_identity() {
        let (mut surface, _) = surface();
        let container = surface.create_container();
        container.append(Element::new("p"));

        surface.clear_container(&container);

        assert!(container.is_empty());
        assert_eq!(surface.current_container(), Some(&container));
    }

    #[test]
    fn test_loader_toggles_are_noops_before_render() {
        let (mut surface, _) = surface();
        surface.show_loader();
        assert!(!surface.loader_visible());
        assert!(surface.snapshot().loader.is_none());
    }

    #[test]
    fn test_loader_show_hide_after_render() {
        let (mut surface, _) = surface();
        surface.render();

        surface.hide_loader();
        assert!(!surface.loader_visible());

        surface.show_loader();
        assert!(surface.loader_visible());

        surface.hide_loader();
        assert!(!surface.loader_visible());
    }

    #[test]
    fn test_render_is_idempotent() {
        let (mut surface, _) = surface();
        surface.render();
        surface.show_loader();
        surface.render();
        assert!(surface.loader_visible());
    }

    #[test]
    fn test_loader_independent_of_container() {
        let (mut surface, _) = surface();
        surface.render();
        surface.create_container();
        surface.show_loader();

        surface.remove_container();

        assert!(surface.loader_visible());
    }

    #[test]
    fn test_forward_toast_publishes_unchanged_payload() {
        let (surface, bus) = surface();
        let mut rx = bus.subscribe();

        surface.forward_toast(json!({"message": "saved"}));

        let (_, event) = rx.try_recv().unwrap();
        assert_eq!(
            event,
            HostEvent::Toast {
                detail: json!({"message": "saved"})
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let (mut surface, _) = surface();
        surface.render();
        let container = surface.create_container();
        container.append(Element::new("p").text("hi"));
        surface.attach_stylesheet("x.js");

        let value = serde_json::to_value(surface.snapshot()).unwrap();
        assert_eq!(value["nodes"][0]["kind"], "stylesheet");
        assert_eq!(value["nodes"][0]["href"], "x.css");
        assert_eq!(value["nodes"][1]["kind"], "container");
        assert_eq!(value["nodes"][1]["children"][0]["text"], "hi");
        assert_eq!(value["loader"]["visible"], false);
    }
}

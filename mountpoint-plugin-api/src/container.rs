//! Container - the node a plugin renders into
//!
//! A [`Container`] is a cheap, clonable handle. Every clone refers to the same
//! node, so a plugin may keep one around and keep rendering or raising
//! requests after `decorate` returns. Requests are delivered to whichever
//! listener the host attached; once the host unmounts the container the
//! listener is detached and further requests are dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::types::Element;

/// Unique identity of a mounted container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(Uuid);

impl ContainerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Requests a plugin raises on its container for the host to act on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerRequest {
    /// Show the host's loading indicator
    DisplayLoader,
    /// Hide the host's loading indicator
    HideLoader,
    /// Show a notification to the user; `detail` is forwarded unchanged
    Toast { detail: serde_json::Value },
}

/// A request tagged with the container it was raised on
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedRequest {
    pub container: ContainerId,
    pub request: ContainerRequest,
}

struct Inner {
    id: ContainerId,
    marker: String,
    content: Mutex<Vec<Element>>,
    listener: Mutex<Option<mpsc::UnboundedSender<ScopedRequest>>>,
}

/// Handle to the container node a plugin decorates.
///
/// Equality is identity: two handles are equal when they refer to the same
/// node, regardless of content.
#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Container {
    /// Create an empty, unattached container tagged with `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: ContainerId::new(),
                marker: marker.into(),
                content: Mutex::new(Vec::new()),
                listener: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.inner.id
    }

    /// Stable marker the host uses to find this container
    pub fn marker(&self) -> &str {
        &self.inner.marker
    }

    /// Whether two handles refer to the same node
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ─── Content ─────────────────────────────────────────────────────

    /// Append an element to the end of the container
    pub fn append(&self, element: Element) {
        lock(&self.inner.content).push(element);
    }

    /// Copy of the current content
    pub fn children(&self) -> Vec<Element> {
        lock(&self.inner.content).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.content).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.content).is_empty()
    }

    /// Remove all content in place. Identity and listener are kept.
    pub fn clear(&self) {
        lock(&self.inner.content).clear();
    }

    // ─── Requests ────────────────────────────────────────────────────

    /// Raise a request on this container.
    ///
    /// Returns `false` when no listener is attached (the container was never
    /// mounted or has been removed) and the request was dropped.
    pub fn dispatch(&self, request: ContainerRequest) -> bool {
        let guard = lock(&self.inner.listener);
        let Some(tx) = guard.as_ref() else {
            tracing::debug!(container = %self.id(), ?request, "No listener attached, request dropped");
            return false;
        };
        tx.send(ScopedRequest {
            container: self.id(),
            request,
        })
        .is_ok()
    }

    pub fn display_loader(&self) -> bool {
        self.dispatch(ContainerRequest::DisplayLoader)
    }

    pub fn hide_loader(&self) -> bool {
        self.dispatch(ContainerRequest::HideLoader)
    }

    pub fn toast(&self, detail: serde_json::Value) -> bool {
        self.dispatch(ContainerRequest::Toast { detail })
    }

    // ─── Host side ───────────────────────────────────────────────────

    /// Attach the host's request listener, replacing any previous one
    pub fn listen(&self, tx: mpsc::UnboundedSender<ScopedRequest>) {
        *lock(&self.inner.listener) = Some(tx);
    }

    /// Detach the request listener
    pub fn detach(&self) {
        lock(&self.inner.listener).take();
    }

    pub fn is_listening(&self) -> bool {
        lock(&self.inner.listener).is_some()
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Container {}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.inner.id)
            .field("marker", &self.inner.marker)
            .field("len", &self.len())
            .field("listening", &self.is_listening())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_container_is_empty_and_unattached() {
        let c = Container::new("plugin-root");
        assert!(c.is_empty());
        assert_eq!(c.marker(), "plugin-root");
        assert!(!c.is_listening());
    }

    #[test]
    fn test_clones_share_identity_and_content() {
        let a = Container::new("m");
        let b = a.clone();
        b.append(Element::new("p"));

        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_distinct_containers_are_not_equal() {
        let a = Container::new("m");
        let b = Container::new("m");
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_dispatch_without_listener_is_dropped() {
        let c = Container::new("m");
        assert!(!c.display_loader());
    }

    #[test]
    fn test_dispatch_reaches_listener_tagged_with_container() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let c = Container::new("m");
        c.listen(tx);

        assert!(c.toast(json!({"message": "saved"})));

        let scoped = rx.try_recv().unwrap();
        assert_eq!(scoped.container, c.id());
        assert_eq!(
            scoped.request,
            ContainerRequest::Toast {
                detail: json!({"message": "saved"})
            }
        );
    }

    #[test]
    fn test_detach_stops_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let c = Container::new("m");
        c.listen(tx);
        c.detach();

        assert!(!c.hide_loader());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clear_keeps_identity_and_listener() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let c = Container::new("m");
        let before = c.id();
        c.listen(tx);
        c.append(Element::new("li"));
        c.append(Element::new("li"));

        c.clear();

        assert!(c.is_empty());
        assert_eq!(c.id(), before);
        assert!(c.display_loader());
        assert_eq!(rx.try_recv().unwrap().request, ContainerRequest::DisplayLoader);
    }

    #[test]
    fn test_request_serialization_is_tagged() {
        let json = serde_json::to_value(ContainerRequest::HideLoader).unwrap();
        assert_eq!(json, json!({"type": "hide_loader"}));
    }
}

//! PluginRenderer - mounts the active plugin in response to bus events
//!
//! The renderer listens for three lifecycle events:
//!
//! - `PluginActivated`: create a container, attach the plugin's stylesheet,
//!   wire the container's requests back to the renderer and decorate it
//! - `PluginDeactivated`: remove the container
//! - `SearchUpdated`: clear the container and decorate it again with the
//!   current search query
//!
//! Requests a plugin raises on its container (show/hide the loader, toast)
//! arrive on a separate queue tagged with the container id. Requests from a
//! container that is no longer mounted are dropped.
//!
//! Every handler runs to completion before the next event or request is
//! looked at. [`PluginRenderer::run`] is the async driver. Hosts that step
//! the bus themselves call [`PluginRenderer::pump`], or feed events straight
//! into [`PluginRenderer::handle_event`] and [`PluginRenderer::drain_requests`].

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use mountpoint_plugin_api::{Container, ContainerRequest, ScopedRequest};

use crate::config::{ActivationPolicy, RendererConfig};
use crate::error::RendererError;
use crate::events::{EventBus, EventSeq, HostEvent};
use crate::store::{AppStore, StoreSnapshot};
use crate::surface::MountSurface;

/// Lifecycle listener driving the mount surface
pub struct PluginRenderer {
    surface: MountSurface,
    policy: ActivationPolicy,
    events_rx: broadcast::Receiver<(EventSeq, HostEvent)>,
    requests_tx: mpsc::UnboundedSender<ScopedRequest>,
    requests_rx: mpsc::UnboundedReceiver<ScopedRequest>,
}

impl PluginRenderer {
    /// Create a renderer subscribed to `bus`.
    ///
    /// The subscription starts here, so events published after `new` returns
    /// are seen by [`run`](Self::run) even if it is spawned later.
    pub fn new(config: &RendererConfig, bus: Arc<dyn EventBus>) -> Self {
        let events_rx = bus.subscribe();
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        Self {
            surface: MountSurface::new(config, bus),
            policy: config.container.on_duplicate_activation,
            events_rx,
            requests_tx,
            requests_rx,
        }
    }

    /// Render the fixed parts of the host surface (the loader)
    pub fn render(&mut self) {
        self.surface.render();
    }

    pub fn surface(&self) -> &MountSurface {
        &self.surface
    }

    // ─── Lifecycle events ────────────────────────────────────────────

    /// Handle one bus event, reading the store at this moment.
    ///
    /// Events the renderer does not listen for are ignored.
    pub fn handle_event(
        &mut self,
        event: &HostEvent,
        store: &dyn AppStore,
    ) -> Result<(), RendererError> {
        if !event.is_lifecycle() {
            tracing::trace!(kind = event.kind(), "Ignoring non-lifecycle event");
            return Ok(());
        }
        match event {
            HostEvent::PluginActivated => {
                self.on_plugin_activated(&store.snapshot())?;
            }
            HostEvent::PluginDeactivated => {
                self.on_plugin_deactivated();
            }
            HostEvent::SearchUpdated => {
                self.on_search_updated(&store.snapshot())?;
            }
            HostEvent::Toast { .. } => {}
        }
        Ok(())
    }

    /// Mount the active plugin into a fresh container.
    ///
    /// On a decoration error the container stays mounted and the error is
    /// returned to the caller.
    pub fn on_plugin_activated(
        &mut self,
        snapshot: &StoreSnapshot,
    ) -> Result<Container, RendererError> {
        let plugin = snapshot
            .active_plugin
            .as_ref()
            .ok_or(RendererError::NoActivePlugin)?;

        if let Some(existing) = self.surface.current_container() {
            match self.policy {
                ActivationPolicy::Replace => {
                    tracing::warn!(
                        container = %existing.id(),
                        "Plugin activated while a container is mounted, replacing it"
                    );
                    self.surface.remove_container();
                }
                ActivationPolicy::Stack => {
                    tracing::warn!(
                        container = %existing.id(),
                        "Plugin activated while a container is mounted, stacking"
                    );
                }
            }
        }

        let container = self.surface.create_container();
        self.surface.attach_stylesheet(&snapshot.active_plugin_path);
        container.listen(self.requests_tx.clone());

        tracing::info!(
            plugin = plugin.name(),
            container = %container.id(),
            path = %snapshot.active_plugin_path,
            "Mounting plugin"
        );

        plugin
            .decorate(&container, &snapshot.plugin_data, None)
            .map_err(|source| RendererError::Decorate {
                plugin: plugin.name().to_string(),
                source,
            })?;

        Ok(container)
    }

    /// Remove the mounted container, if any
    pub fn on_plugin_deactivated(&mut self) -> Option<Container> {
        let removed = self.surface.remove_container();
        if let Some(container) = &removed {
            tracing::info!(container = %container.id(), "Plugin unmounted");
        }
        removed
    }

    /// Clear and re-decorate the mounted container with the current query.
    ///
    /// Returns `Ok(false)` when nothing is mounted.
    pub fn on_search_updated(&mut self, snapshot: &StoreSnapshot) -> Result<bool, RendererError> {
        let Some(container) = self.surface.current_container().cloned() else {
            tracing::debug!("Search updated with no container mounted, ignoring");
            return Ok(false);
        };
        let plugin = snapshot
            .active_plugin
            .as_ref()
            .ok_or(RendererError::NoActivePlugin)?;

        self.surface.clear_container(&container);

        tracing::debug!(
            plugin = plugin.name(),
            query = %snapshot.search_query,
            "Re-decorating for search"
        );

        plugin
            .decorate(
                &container,
                &snapshot.plugin_data,
                Some(&snapshot.search_query),
            )
            .map_err(|source| RendererError::Decorate {
                plugin: plugin.name().to_string(),
                source,
            })?;

        Ok(true)
    }

    // ─── Container requests ──────────────────────────────────────────

    /// Act on a request raised by a plugin on its container
    pub fn handle_request(&mut self, scoped: ScopedRequest) {
        if !self.surface.is_mounted(scoped.container) {
            tracing::debug!(
                container = %scoped.container,
                request = ?scoped.request,
                "Request from unmounted container dropped"
            );
            return;
        }

        match scoped.request {
            ContainerRequest::DisplayLoader => self.surface.show_loader(),
            ContainerRequest::HideLoader => self.surface.hide_loader(),
            ContainerRequest::Toast { detail } => {
                let seq = self.surface.forward_toast(detail);
                tracing::debug!(seq, "Toast forwarded");
            }
        }
    }

    /// Handle every queued container request. Returns how many were taken.
    pub fn drain_requests(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(scoped) = self.requests_rx.try_recv() {
            self.handle_request(scoped);
            handled += 1;
        }
        handled
    }

    // ─── Driver ──────────────────────────────────────────────────────

    /// Handle everything already delivered to the renderer's subscription,
    /// plus the container requests it causes. Returns the number of bus
    /// events taken.
    ///
    /// Stops at the first handler error; events after it stay queued.
    pub fn pump(&mut self, store: &dyn AppStore) -> Result<usize, RendererError> {
        let mut handled = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok((_, event)) => {
                    handled += 1;
                    self.handle_event(&event, store)?;
                    self.drain_requests();
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer lagged behind the event bus");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => break,
            }
        }
        self.drain_requests();
        Ok(handled)
    }

    /// Process bus events and container requests until `shutdown` fires or
    /// the bus closes. Returns the renderer so the host can inspect it.
    ///
    /// Handler errors are logged and do not stop the loop.
    pub async fn run(mut self, store: Arc<dyn AppStore>, shutdown: CancellationToken) -> Self {
        tracing::debug!("Plugin renderer started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(scoped) = self.requests_rx.recv() => self.handle_request(scoped),
                received = self.events_rx.recv() => match received {
                    Ok((seq, event)) => {
                        if let Err(e) = self.handle_event(&event, store.as_ref()) {
                            tracing::error!(seq, kind = event.kind(), error = %e, "Lifecycle handler failed");
                        }
                        // requests raised while handling belong to this event
                        self.drain_requests();
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Renderer lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        tracing::debug!("Plugin renderer stopped");
        self
    }
}

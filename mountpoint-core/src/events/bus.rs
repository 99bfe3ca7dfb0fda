//! EventBus trait definition
//!
//! The shared channel lifecycle and notification events travel on. Publishing
//! never blocks: handlers run on the subscriber side, one event at a time.

use tokio::sync::broadcast;

use super::HostEvent;

/// Sequence number for events (monotonically increasing)
pub type EventSeq = u64;

/// Event bus for publishing and subscribing to HostEvents
///
/// Implementations must support:
/// - Publishing events with sequence numbers
/// - Live subscriptions via broadcast channel, delivered in publish order
/// - Replay of recent history (implementations may bound how much is kept)
pub trait EventBus: Send + Sync {
    /// Publish an event, returns its sequence number
    fn publish(&self, event: HostEvent) -> EventSeq;

    /// Subscribe to all events from now (live stream)
    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, HostEvent)>;

    /// Retained events starting from a sequence number (for replay)
    fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, HostEvent)>;

    /// Current sequence number (high water mark)
    fn current_seq(&self) -> EventSeq;
}

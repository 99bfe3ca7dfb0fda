//! In-memory EventBus implementation
//!
//! MemoryEventBus keeps the most recent events for replay, bounded by the
//! channel capacity, and uses a broadcast channel for live subscribers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;

use super::HostEvent;
use super::bus::{EventBus, EventSeq};

/// Default broadcast capacity when none is configured
pub const DEFAULT_CAPACITY: usize = 256;

/// In-memory implementation of EventBus
///
/// Sequence assignment, history append and broadcast happen under the same
/// write lock, so subscribers observe events in sequence order.
pub struct MemoryEventBus {
    /// Most recent events with sequence numbers, oldest first
    events: RwLock<VecDeque<(EventSeq, HostEvent)>>,
    /// Maximum number of events kept in `events`
    capacity: usize,
    /// Next sequence number to assign
    next_seq: AtomicU64,
    /// Broadcast channel for live subscribers
    tx: broadcast::Sender<(EventSeq, HostEvent)>,
}

impl MemoryEventBus {
    /// Create a new MemoryEventBus with the given broadcast channel capacity
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
            next_seq: AtomicU64::new(0),
            tx,
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus for MemoryEventBus {
    fn publish(&self, event: HostEvent) -> EventSeq {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        tracing::trace!(seq, kind = event.kind(), "Publishing event");
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back((seq, event.clone()));

        // Broadcast to live subscribers (ignore if no receivers)
        let _ = self.tx.send((seq, event));

        seq
    }

    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, HostEvent)> {
        self.tx.subscribe()
    }

    fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, HostEvent)> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, _)| *s >= seq)
            .cloned()
            .collect()
    }

    fn current_seq(&self) -> EventSeq {
        self.next_seq.load(Ordering::SeqCst)
    }
}

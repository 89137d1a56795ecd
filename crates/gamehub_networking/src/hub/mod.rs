//! # In-Process Hub
//!
//! Room broker for sessions that live in the same process.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 InProcessHub                 │
//! ├──────────────────────────────────────────────┤
//! │  rooms: RwLock<room_id -> {id -> Sender}>    │
//! │                                              │
//! │  publish ──► try_send ──► inbox (bounded)    │
//! │                  │                           │
//! │                  └─ Full/Disconnected: drop  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Publishing only takes the read lock, so rooms fan out in parallel.
//! Subscribe and unsubscribe take the write lock briefly.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Sender, TrySendError};
use gamehub_shared::constants::DEFAULT_INBOX_CAPACITY;
use gamehub_shared::RoomEvent;
use parking_lot::RwLock;

use crate::transport::{DeliveryStats, Inbox, RoomTransport, SubscriberId};

/// Subscribers of one room, in subscription order.
type Room = BTreeMap<SubscriberId, Sender<RoomEvent>>;

/// In-process room broker.
pub struct InProcessHub {
    /// Open rooms. A room exists while it has subscribers.
    rooms: RwLock<HashMap<String, Room>>,
    /// Per-subscriber inbox size.
    inbox_capacity: usize,
    /// Next subscriber id.
    next_id: AtomicU64,
    /// Events published.
    published: AtomicU64,
    /// Events placed in an inbox.
    delivered: AtomicU64,
    /// Events missed.
    dropped: AtomicU64,
}

impl InProcessHub {
    /// Creates a hub with the given inbox capacity (at least 1).
    #[must_use]
    pub fn new(inbox_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            inbox_capacity: inbox_capacity.max(1),
            next_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Per-subscriber inbox size.
    #[inline]
    #[must_use]
    pub const fn inbox_capacity(&self) -> usize {
        self.inbox_capacity
    }

    /// Ids of the rooms that currently have subscribers, sorted.
    #[must_use]
    pub fn room_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rooms.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Resets the delivery counters.
    pub fn reset_stats(&self) {
        self.published.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

impl Default for InProcessHub {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX_CAPACITY)
    }
}

impl RoomTransport for InProcessHub {
    fn subscribe(&self, room_id: &str) -> (SubscriberId, Inbox) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = bounded(self.inbox_capacity);

        self.rooms.write().entry(room_id.to_string()).or_default().insert(id, tx);

        tracing::debug!(room = room_id, subscriber = %id, "subscribed");
        (id, rx)
    }

    fn unsubscribe(&self, room_id: &str, id: SubscriberId) {
        let mut rooms = self.rooms.write();
        if let Some(room) = rooms.get_mut(room_id) {
            room.remove(&id);
            if room.is_empty() {
                rooms.remove(room_id);
            }
        }
        tracing::debug!(room = room_id, subscriber = %id, "unsubscribed");
    }

    fn publish(&self, room_id: &str, event: &RoomEvent, exclude: Option<SubscriberId>) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);

        let rooms = self.rooms.read();
        let Some(room) = rooms.get(room_id) else {
            return 0;
        };

        let mut delivered = 0usize;
        let mut dropped = 0u64;
        for (id, tx) in room {
            if Some(*id) == exclude {
                continue;
            }
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    dropped += 1;
                    tracing::debug!(room = room_id, subscriber = %id, kind = event.kind(), "inbox full, event dropped");
                }
                Err(TrySendError::Disconnected(_)) => {
                    dropped += 1;
                    tracing::debug!(room = room_id, subscriber = %id, kind = event.kind(), "inbox closed, event dropped");
                }
            }
        }

        self.delivered.fetch_add(delivered as u64, Ordering::Relaxed);
        self.dropped.fetch_add(dropped, Ordering::Relaxed);
        delivered
    }

    fn subscriber_count(&self, room_id: &str) -> usize {
        self.rooms.read().get(room_id).map_or(0, BTreeMap::len)
    }

    fn stats(&self) -> DeliveryStats {
        let subscribers = self.rooms.read().values().map(|r| r.len() as u64).sum();
        DeliveryStats {
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            subscribers,
        }
    }
}

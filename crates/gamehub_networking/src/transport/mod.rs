//! # Transport Layer
//!
//! The contract every room backend implements.
//!
//! ## Design
//!
//! - Each subscription owns a bounded inbox
//! - `publish` never blocks: a full or closed inbox misses the event
//! - No history: a subscriber only sees events published after it subscribed
//!
//! [`crate::InProcessHub`] is the in-process backend. Anything that keeps
//! these guarantees (a broker, a socket relay) can stand in for it.

use crossbeam_channel::Receiver;
use gamehub_shared::RoomEvent;

/// Unique identifier for one subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiving end of a subscription.
pub type Inbox = Receiver<RoomEvent>;

/// Delivery statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Events published.
    pub published: u64,
    /// Events placed in an inbox.
    pub delivered: u64,
    /// Events missed because an inbox was full or closed.
    pub dropped: u64,
    /// Subscriptions currently open.
    pub subscribers: u64,
}

impl DeliveryStats {
    /// Fraction of attempted deliveries that were dropped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn drop_rate(&self) -> f64 {
        let attempts = self.delivered + self.dropped;
        if attempts == 0 {
            0.0
        } else {
            self.dropped as f64 / attempts as f64
        }
    }
}

/// A room-scoped publish/subscribe backend.
pub trait RoomTransport: Send + Sync {
    /// Opens a subscription to `room_id`.
    fn subscribe(&self, room_id: &str) -> (SubscriberId, Inbox);

    /// Closes a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, room_id: &str, id: SubscriberId);

    /// Delivers `event` to every subscriber of `room_id` except `exclude`.
    ///
    /// Returns the number of inboxes the event was placed in.
    fn publish(&self, room_id: &str, event: &RoomEvent, exclude: Option<SubscriberId>) -> usize;

    /// Number of open subscriptions in `room_id`.
    fn subscriber_count(&self, room_id: &str) -> usize;

    /// Returns delivery statistics.
    fn stats(&self) -> DeliveryStats;
}

//! # Room Subscription
//!
//! Scoped membership of one room.
//!
//! Opening a subscription announces `presence:join`. Dropping it announces
//! `presence:leave` to the rest of the room and then unsubscribes. Drop runs
//! exactly once, so a session that leaves, rejoins elsewhere, or simply goes
//! away is always announced once.

use std::sync::Arc;

use gamehub_shared::RoomEvent;

use crate::transport::{Inbox, RoomTransport, SubscriberId};

/// Membership of one room. Leaves on drop.
pub struct RoomSubscription {
    /// Backend the subscription lives on.
    transport: Arc<dyn RoomTransport>,
    /// Joined room.
    room_id: String,
    /// User the presence events are tagged with.
    user_id: String,
    /// Subscription handle.
    id: SubscriberId,
    /// Events addressed to this subscription.
    inbox: Inbox,
}

impl RoomSubscription {
    /// Subscribes to `room_id` and announces the join to everyone in the
    /// room, this subscription included.
    #[must_use]
    pub fn open(transport: Arc<dyn RoomTransport>, room_id: &str, user_id: &str) -> Self {
        let (id, inbox) = transport.subscribe(room_id);
        let notified = transport.publish(
            room_id,
            &RoomEvent::Join {
                from: user_id.to_string(),
            },
            None,
        );

        tracing::info!(room = room_id, user = user_id, subscriber = %id, notified, "joined room");

        Self {
            transport,
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            id,
            inbox,
        }
    }

    /// Joined room.
    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// User this membership belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Subscription handle.
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Publishes to everyone in the room except this subscription.
    pub fn publish_to_others(&self, event: &RoomEvent) -> usize {
        self.transport.publish(&self.room_id, event, Some(self.id))
    }

    /// Takes every event waiting in the inbox, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<RoomEvent> {
        self.inbox.try_iter().collect()
    }

    /// Number of events waiting in the inbox.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

impl Drop for RoomSubscription {
    fn drop(&mut self) {
        let notified = self.publish_to_others(&RoomEvent::Leave {
            from: self.user_id.clone(),
        });
        self.transport.unsubscribe(&self.room_id, self.id);

        tracing::info!(room = %self.room_id, user = %self.user_id, subscriber = %self.id, notified, "left room");
    }
}

impl std::fmt::Debug for RoomSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomSubscription")
            .field("room_id", &self.room_id)
            .field("user_id", &self.user_id)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

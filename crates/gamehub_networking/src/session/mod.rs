//! # Room Session
//!
//! One user's view of room chat.
//!
//! ## State Machine
//!
//! ```text
//!                 join(r)
//! Disconnected ─────────────► Joined(r)
//!      ▲                       │   ▲
//!      │ leave() / drop        │   │ join(r2): leave r, enter r2
//!      └───────────────────────┘───┘
//! ```
//!
//! Membership is held by a [`RoomSubscription`], so presence bookkeeping
//! follows ownership: replacing or dropping it is what announces the leave.

mod subscription;

pub use subscription::RoomSubscription;

use std::sync::Arc;

use gamehub_security::ModerationFilter;
use gamehub_shared::constants::{DEFAULT_CHAT_LOG_CAPACITY, DEFAULT_ROOM};
use gamehub_shared::RoomEvent;

use crate::error::{MessagingError, MessagingResult};
use crate::transport::RoomTransport;

/// Suffix appended to the local echo of a filtered line.
pub const FILTERED_MARKER: &str = " [filtered]";

/// Membership state of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Not in any room.
    Disconnected,
    /// Subscribed to the named room.
    Joined(String),
}

/// What the sender sees right after sending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEcho {
    /// Line appended to the sender's own chat log.
    pub line: String,
    /// Whether the text matched the denylist.
    pub flagged: bool,
    /// How many other sessions the line was delivered to.
    pub delivered: usize,
}

/// A user's chat session.
pub struct RoomSession {
    /// User every event is tagged with.
    user_id: String,
    /// Room backend.
    transport: Arc<dyn RoomTransport>,
    /// Applied to every outgoing line.
    filter: Arc<ModerationFilter>,
    /// Current membership, if any.
    subscription: Option<RoomSubscription>,
    /// Rendered lines, oldest first.
    chat_log: Vec<String>,
    /// Most lines kept in `chat_log`.
    log_capacity: usize,
}

impl RoomSession {
    /// Creates a disconnected session.
    #[must_use]
    pub fn new(user_id: &str, transport: Arc<dyn RoomTransport>, filter: Arc<ModerationFilter>) -> Self {
        Self {
            user_id: user_id.to_string(),
            transport,
            filter,
            subscription: None,
            chat_log: Vec::new(),
            log_capacity: DEFAULT_CHAT_LOG_CAPACITY,
        }
    }

    /// Keeps at most `capacity` lines in the chat log (at least one).
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        self.trim_log();
        self
    }

    /// Most lines the chat log keeps.
    #[must_use]
    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    fn trim_log(&mut self) {
        let excess = self.chat_log.len().saturating_sub(self.log_capacity);
        if excess > 0 {
            self.chat_log.drain(..excess);
        }
    }

    /// User this session speaks for.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current membership state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.subscription
            .as_ref()
            .map_or(SessionState::Disconnected, |s| SessionState::Joined(s.room_id().to_string()))
    }

    /// Joined room, if any.
    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        self.subscription.as_ref().map(RoomSubscription::room_id)
    }

    /// Joins `room_id`, leaving the current room first.
    ///
    /// A blank id joins the default room. Returns the joined room id.
    pub fn join(&mut self, room_id: &str) -> &str {
        let room_id = match room_id.trim() {
            "" => DEFAULT_ROOM,
            trimmed => trimmed,
        };

        // Release first so the old room hears the leave before anyone
        // hears the join.
        self.subscription = None;
        let subscription = RoomSubscription::open(Arc::clone(&self.transport), room_id, &self.user_id);
        self.subscription.insert(subscription).room_id()
    }

    /// Leaves the current room. Returns false if not joined.
    pub fn leave(&mut self) -> bool {
        self.subscription.take().is_some()
    }

    /// Filters and sends a chat line to the rest of the room.
    ///
    /// The echo is appended to this session's chat log immediately; it is
    /// never delivered back through the room.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::NotJoined`] when disconnected and
    /// [`MessagingError::EmptyMessage`] for blank text.
    pub fn send(&mut self, text: &str) -> MessagingResult<ChatEcho> {
        let subscription = self.subscription.as_ref().ok_or(MessagingError::NotJoined)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(MessagingError::EmptyMessage);
        }

        let sanitized = self.filter.sanitize(text);
        let mut line = format!("{}: {}", self.user_id, sanitized.cleaned);
        if sanitized.flagged {
            line.push_str(FILTERED_MARKER);
        }

        let delivered = subscription.publish_to_others(&RoomEvent::Chat {
            from: self.user_id.clone(),
            message: sanitized.cleaned,
        });

        tracing::debug!(user = %self.user_id, room = subscription.room_id(), flagged = sanitized.flagged, delivered, "chat sent");
        self.chat_log.push(line.clone());
        self.trim_log();

        Ok(ChatEcho {
            line,
            flagged: sanitized.flagged,
            delivered,
        })
    }

    /// Drains received events into the chat log and returns them.
    ///
    /// Returns nothing when disconnected.
    pub fn poll(&mut self) -> Vec<RoomEvent> {
        let events = self.subscription.as_ref().map(RoomSubscription::drain).unwrap_or_default();
        self.chat_log.extend(events.iter().map(RoomEvent::render));
        self.trim_log();
        events
    }

    /// Rendered lines, oldest first. Holds at most
    /// [`RoomSession::log_capacity`] lines.
    #[must_use]
    pub fn chat_log(&self) -> &[String] {
        &self.chat_log
    }
}

//! Room event envelope shared by every messaging transport.
//!
//! Wire form:
//!
//! ```text
//! { "type": "chat",           "from": "alice", "message": "hello" }
//! { "type": "presence:join",  "from": "alice" }
//! { "type": "presence:leave", "from": "alice" }
//! ```

use serde::{Deserialize, Serialize};

/// An event fanned out to the subscribers of one room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// A chat line, already moderated.
    #[serde(rename = "chat")]
    Chat {
        /// Sender's user id.
        from: String,
        /// Filtered message text.
        message: String,
    },
    /// A user subscribed to the room.
    #[serde(rename = "presence:join")]
    Join {
        /// Joining user id.
        from: String,
    },
    /// A user's subscription ended.
    #[serde(rename = "presence:leave")]
    Leave {
        /// Leaving user id.
        from: String,
    },
}

impl RoomEvent {
    /// The user the event is about.
    #[must_use]
    pub fn sender(&self) -> &str {
        match self {
            Self::Chat { from, .. } | Self::Join { from } | Self::Leave { from } => from,
        }
    }

    /// The `type` tag as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Join { .. } => "presence:join",
            Self::Leave { .. } => "presence:leave",
        }
    }

    /// Line shown in a chat log for this event.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Chat { from, message } => format!("{from}: {message}"),
            Self::Join { from } => format!("[system] {from} joined"),
            Self::Leave { from } => format!("[system] {from} left"),
        }
    }

    /// Encodes the envelope for an out-of-process transport.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes an envelope received from an out-of-process transport.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a valid envelope.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

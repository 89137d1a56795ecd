//! # GAMEHUB Networking - The Rooms
//!
//! Room-scoped publish/subscribe for chat and presence events.
//!
//! ## Architecture
//!
//! - **Transport**: [`RoomTransport`] is the seam; [`InProcessHub`] is the
//!   in-process backend with bounded inboxes
//! - **Session**: [`RoomSession`] is the per-user `Disconnected -> Joined`
//!   state machine with its rendered chat log
//! - **Membership**: [`RoomSubscription`] owns one room membership and
//!   announces the leave when dropped
//!
//! ## Delivery Model
//!
//! ```text
//! SENDER                 HUB                      OTHERS
//!   |                     |                          |
//!   |-- send("hello") --->|-- try_send(chat) ------->| inbox
//!   |<- echo "A: hello"   |   (full inbox: dropped)  |
//!   |                     |                          |-- poll() -> "A: hello"
//! ```
//!
//! Best effort, at most once per subscribed session, never blocking the
//! sender. Late joiners get no history.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gamehub_networking::{InProcessHub, RoomSession, RoomTransport};
//! use gamehub_security::ModerationFilter;
//!
//! let hub: Arc<dyn RoomTransport> = Arc::new(InProcessHub::default());
//! let filter = Arc::new(ModerationFilter::default());
//!
//! let mut a = RoomSession::new("A", Arc::clone(&hub), Arc::clone(&filter));
//! let mut b = RoomSession::new("B", hub, filter);
//! a.join("r1");
//! b.join("r1");
//!
//! assert_eq!(a.send("hello").unwrap().line, "A: hello");
//! b.poll();
//! assert_eq!(b.chat_log().last().map(String::as_str), Some("A: hello"));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod hub;
pub mod session;
pub mod transport;

pub use error::{MessagingError, MessagingResult};
pub use hub::InProcessHub;
pub use session::{ChatEcho, RoomSession, RoomSubscription, SessionState, FILTERED_MARKER};
pub use transport::{DeliveryStats, Inbox, RoomTransport, SubscriberId};

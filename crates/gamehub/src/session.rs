//! # Client Session
//!
//! One client's view of the hub: the active profile, its purchases and
//! reports, and at most one room.
//!
//! Every operation except [`ClientSession::login`] needs a profile and
//! fails with [`HubError::NoProfile`] without one.

use std::sync::Arc;

use gamehub_economy::EconomyError;
use gamehub_networking::{ChatEcho, MessagingError, RoomSession};
use gamehub_shared::constants::GUEST_NAME;
use gamehub_shared::{Receipt, Report, RoomEvent, User};

use crate::error::{HubError, HubResult};
use crate::hub::Services;

/// A user's profile as shown to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Username.
    pub username: String,
    /// Current balance.
    pub balance: u64,
    /// Owned item ids, in purchase order.
    pub inventory: Vec<String>,
    /// Receipts, newest first.
    pub receipts: Vec<Receipt>,
}

impl Profile {
    fn from_user(username: &str, user: User) -> Self {
        let mut receipts = user.receipts;
        receipts.reverse();
        Self {
            username: username.to_string(),
            balance: user.balance,
            inventory: user.inventory,
            receipts,
        }
    }
}

/// A client connected to the hub.
pub struct ClientSession {
    /// Hub services.
    services: Arc<Services>,
    /// Active username.
    username: Option<String>,
    /// Room chat, once a room was joined.
    chat: Option<RoomSession>,
}

impl ClientSession {
    pub(crate) fn new(services: Arc<Services>) -> Self {
        Self {
            services,
            username: None,
            chat: None,
        }
    }

    /// Active username, if logged in.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn require_profile(&self) -> HubResult<&str> {
        self.username.as_deref().ok_or(HubError::NoProfile)
    }

    /// Sets the active profile, creating the user on first use.
    ///
    /// A blank name logs in as `"guest"`. Switching to a different user
    /// leaves the current room.
    ///
    /// # Errors
    ///
    /// Returns error if a new user could not be saved.
    pub fn login(&mut self, name: &str) -> HubResult<Profile> {
        let name = match name.trim() {
            "" => GUEST_NAME,
            trimmed => trimmed,
        };

        let user = self.services.ledger.ensure_user(name)?;
        if self.username.as_deref() != Some(name) {
            self.chat = None;
            self.username = Some(name.to_string());
        }

        tracing::info!(user = name, balance = user.balance, "profile set");
        Ok(Profile::from_user(name, user))
    }

    /// The active user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in.
    pub fn profile(&self) -> HubResult<Profile> {
        let name = self.require_profile()?;
        let user = self
            .services
            .ledger
            .user(name)
            .ok_or_else(|| EconomyError::UserNotFound(name.to_string()))?;
        Ok(Profile::from_user(name, user))
    }

    /// Adds the configured grant to the active user. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns error if not logged in or the grant could not be saved.
    pub fn grant(&self) -> HubResult<u64> {
        let name = self.require_profile()?;
        Ok(self.services.ledger.grant(name, self.services.config.economy.grant_amount)?)
    }

    /// Buys one unit of `item_id`.
    ///
    /// # Errors
    ///
    /// Returns error if not logged in, or the ledger rejects or fails the
    /// purchase.
    pub fn buy(&self, item_id: &str) -> HubResult<Receipt> {
        let name = self.require_profile()?;
        Ok(self.services.ledger.purchase(name, item_id.trim())?)
    }

    /// Files a report as the active user. Blank fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if not logged in or the report could not be saved.
    pub fn submit_report(&self, report_type: Option<&str>, target_id: Option<&str>, reason: &str) -> HubResult<Report> {
        let name = self.require_profile()?;
        Ok(self.services.reports.submit(name, report_type, target_id, reason)?)
    }

    /// Joins `room_id`, or the configured default room if blank. Returns the
    /// joined room id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in.
    pub fn join_room(&mut self, room_id: &str) -> HubResult<String> {
        let name = self.require_profile()?.to_string();
        let room_id = match room_id.trim() {
            "" => self.services.config.messaging.default_room.as_str(),
            trimmed => trimmed,
        };

        let services = &self.services;
        let chat = self.chat.get_or_insert_with(|| {
            RoomSession::new(&name, Arc::clone(&services.transport), Arc::clone(&services.filter))
                .with_log_capacity(services.config.messaging.chat_log_capacity)
        });
        Ok(chat.join(room_id).to_string())
    }

    /// Leaves the current room. Returns false if not in one.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in.
    pub fn leave_room(&mut self) -> HubResult<bool> {
        self.require_profile()?;
        Ok(self.chat.as_mut().is_some_and(RoomSession::leave))
    }

    /// Current room, if any.
    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        self.chat.as_ref().and_then(RoomSession::room_id)
    }

    /// Sends a chat line to the current room.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in, or a
    /// [`MessagingError`] if not in a room or the line is blank.
    pub fn send_chat(&mut self, text: &str) -> HubResult<ChatEcho> {
        self.require_profile()?;
        let chat = self.chat.as_mut().ok_or(MessagingError::NotJoined)?;
        Ok(chat.send(text)?)
    }

    /// Takes every event received since the last poll.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in.
    pub fn poll_chat(&mut self) -> HubResult<Vec<RoomEvent>> {
        self.require_profile()?;
        Ok(self.chat.as_mut().map(RoomSession::poll).unwrap_or_default())
    }

    /// Rendered chat lines, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NoProfile`] if not logged in.
    pub fn chat_log(&self) -> HubResult<&[String]> {
        self.require_profile()?;
        Ok(self.chat.as_ref().map(RoomSession::chat_log).unwrap_or_default())
    }
}

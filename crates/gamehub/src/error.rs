//! # Hub Error Types
//!
//! Every service error, plus the two the facade adds itself.

use gamehub_economy::EconomyError;
use gamehub_networking::MessagingError;
use gamehub_security::{ModerationError, ReportError};
use gamehub_shared::StoreError;
use thiserror::Error;

/// Errors returned by the caller-facing API.
#[derive(Error, Debug)]
pub enum HubError {
    /// The session has not logged in.
    #[error("set a profile first")]
    NoProfile,

    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Ledger rejected or failed the request.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// Report could not be saved.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Moderation settings are invalid.
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    /// Chat request rejected.
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    /// Saved state could not be loaded.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HubError {
    /// Returns true if the request was rejected without touching any state.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::NoProfile | Self::Messaging(_) => true,
            Self::Economy(e) => !matches!(e, EconomyError::Persistence(_) | EconomyError::InvalidConfig(_)),
            Self::Config(_) | Self::Report(_) | Self::Moderation(_) | Self::Store(_) => false,
        }
    }
}

/// Result type for hub operations.
pub type HubResult<T> = Result<T, HubError>;

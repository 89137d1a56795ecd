//! # Messaging Error Types

use thiserror::Error;

/// Errors raised by a room session.
///
/// Both are local rejections: nothing was published.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagingError {
    /// The session has not joined a room.
    #[error("join a room first")]
    NotJoined,

    /// The message was blank after trimming.
    #[error("message is empty")]
    EmptyMessage,
}

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;

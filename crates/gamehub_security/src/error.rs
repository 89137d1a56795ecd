//! Report log errors.

use gamehub_shared::StoreError;
use thiserror::Error;

pub use crate::moderation::ModerationError;

/// Errors raised by the report log.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report could not be saved and was not appended.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

//! # Economy Error Types
//!
//! All errors that can occur in the economy ledger.

use gamehub_shared::StoreError;
use thiserror::Error;

/// Errors that can occur in the economy ledger.
///
/// Every variant except [`EconomyError::Persistence`] is a rejected request:
/// nothing was changed and the caller may simply report it.
#[derive(Error, Debug)]
pub enum EconomyError {
    /// No user with this name exists.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Item not found in the catalog.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The item's mint cap has been reached.
    #[error("supply exhausted for {item_id}: {minted}/{mint_cap} minted")]
    SupplyExhausted {
        /// Item that sold out.
        item_id: String,
        /// Units minted.
        minted: u64,
        /// The cap.
        mint_cap: u64,
    },

    /// Balance is lower than the price.
    #[error("insufficient funds: need {price}, have {balance}")]
    InsufficientFunds {
        /// Price of the item.
        price: u64,
        /// Current balance.
        balance: u64,
    },

    /// A grant of zero.
    #[error("amount must be positive")]
    ZeroAmount,

    /// Arithmetic overflow in a balance or counter.
    #[error("arithmetic overflow in economic calculation")]
    ArithmeticOverflow,

    /// Invalid catalog or economy configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The mutation could not be saved and was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl EconomyError {
    /// Returns true for the "unknown reference" family of errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::ItemNotFound(_))
    }
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

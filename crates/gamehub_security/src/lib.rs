//! # GAMEHUB Security - The Filter
//!
//! Content moderation for chat lines and user reports.
//!
//! ## Architecture
//!
//! ```text
//! CHAT LINE                     REPORT
//!     │                            │
//!     ▼                            ▼
//! ┌─────────────────────────────────────┐
//! │ ModerationFilter::sanitize          │  pure, shared, no locks
//! └─────────────────────────────────────┘
//!     │                            │
//!     ▼                            ▼
//! room broadcast              ReportLog ──► SharedState ──► store
//! ```
//!
//! ## Example
//!
//! ```rust
//! use gamehub_security::ModerationFilter;
//!
//! let result = ModerationFilter::default().sanitize("this is badword here");
//! assert_eq!(result.cleaned, "this is **** here");
//! assert!(result.flagged);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod moderation;
pub mod reports;

pub use error::{ReportError, ReportResult};
pub use moderation::{ModerationConfig, ModerationError, ModerationFilter, Sanitized};
pub use reports::ReportLog;

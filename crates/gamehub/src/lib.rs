//! # GAMEHUB
//!
//! The caller-facing crate, wiring every service into one hub.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              GAMEHUB                                │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │   Economy       │   │   Security      │   │   Networking    │    │
//! │  │  • Ledger       │   │  • Filter       │──>│  • Rooms        │    │
//! │  │  • Catalog      │   │  • Report log   │   │  • Sessions     │    │
//! │  └────────┬────────┘   └────────┬────────┘   └─────────────────┘    │
//! │           │                     │                                   │
//! │           └──────────┬──────────┘                                   │
//! │                      ▼                                              │
//! │          ┌───────────────────────┐                                  │
//! │          │ SharedState -> store  │                                  │
//! │          └───────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gamehub::{GameHub, HubConfig};
//! use gamehub::networking::InProcessHub;
//! use gamehub::shared::MemoryStore;
//!
//! let hub = GameHub::with_store(
//!     HubConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(InProcessHub::default()),
//! )?;
//!
//! let mut alice = hub.session();
//! alice.login("alice")?;
//! let receipt = alice.buy("pet_egg_basic")?;
//! assert_eq!(receipt.amount, 100);
//! # Ok::<(), gamehub::HubError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod console;
pub mod error;
pub mod hub;
pub mod session;

// Re-export the services
pub use gamehub_economy as economy;
pub use gamehub_networking as networking;
pub use gamehub_security as security;
pub use gamehub_shared as shared;

pub use config::{HubConfig, MessagingConfig, StorageConfig};
pub use console::{Console, Outcome};
pub use error::{HubError, HubResult};
pub use hub::GameHub;
pub use session::{ClientSession, Profile};

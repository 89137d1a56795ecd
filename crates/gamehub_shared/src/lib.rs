//! # GAMEHUB Shared
//!
//! Common types used by the economy, moderation and messaging crates.
//!
//! ## Contents
//!
//! - [`model`]: the persisted aggregate ([`Snapshot`]) and its records
//! - [`store`]: the load/save contract and two stores
//! - [`state`]: the single lock every mutation goes through
//! - [`protocol`]: the room event envelope
//!
//! ## CRITICAL RULE
//!
//! The snapshot is the only durability boundary. Nothing outside
//! [`state::SharedState::transact`] may write to a [`store::PersistentStore`].

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod model;
pub mod protocol;
pub mod state;
pub mod store;

pub use model::{now_millis, new_record_id, Item, ItemId, Receipt, Report, Snapshot, User};
pub use protocol::RoomEvent;
pub use state::SharedState;
pub use store::{JsonFileStore, MemoryStore, PersistentStore, StoreError, StoreResult};

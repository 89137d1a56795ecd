//! # GAMEHUB Economy
//!
//! Fixed-price purchases of supply-capped items with persisted balances.
//!
//! ## Design Principles
//!
//! 1. **Integers only** - balances, prices and counters are `u64`
//! 2. **One lock** - every mutation is a single shared-state transaction
//! 3. **Saved or it didn't happen** - a failed save rolls the mutation back
//! 4. **External configuration** - prices and caps come from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use gamehub_economy::{EconomyConfig, EconomyLedger};
//!
//! let config = EconomyConfig::default();
//! let state = Arc::new(SharedState::open(store, || EconomyLedger::seed_snapshot(&config))?);
//! let ledger = EconomyLedger::new(state, &config);
//!
//! ledger.ensure_user("alice")?;
//! let receipt = ledger.purchase("alice", "pet_egg_basic")?;
//! assert_eq!(receipt.amount, 100);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod error;
pub mod ledger;

pub use catalog::{default_catalog, CatalogEntry, EconomyConfig};
pub use error::{EconomyError, EconomyResult};
pub use ledger::EconomyLedger;

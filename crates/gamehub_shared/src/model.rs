//! # Snapshot Model
//!
//! The complete persisted state: users, the item catalog and the report log.
//!
//! ## Document Shape
//!
//! ```text
//! {
//!   "users":   { "<username>": { "balance", "inventory", "receipts": [..] } },
//!   "items":   [ { "id", "name", "price", "mintCap"?, "minted" } ],
//!   "reports": [ { "id", "userId", "type", "targetId", "reason", "flagged", "timestamp" } ]
//! }
//! ```
//!
//! Field names are part of the on-disk format. Renaming one breaks old saves.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Unique identifier for an item in the catalog.
pub type ItemId = String;

/// Immutable record of one completed purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Globally unique receipt id.
    pub id: String,
    /// Item that was bought.
    pub item_id: ItemId,
    /// Price paid, copied at purchase time.
    pub amount: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// A user account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Spendable currency.
    pub balance: u64,
    /// Owned items in purchase order. Duplicates allowed.
    pub inventory: Vec<ItemId>,
    /// Purchase history, oldest first. Append-only.
    pub receipts: Vec<Receipt>,
}

impl User {
    /// Creates a user with the given balance and nothing else.
    #[must_use]
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance,
            inventory: Vec::new(),
            receipts: Vec::new(),
        }
    }

    /// Counts how many units of an item this user owns.
    #[must_use]
    pub fn count_item(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|id| id.as_str() == item_id).count()
    }
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Price in currency units. Always positive.
    pub price: u64,
    /// Maximum units that may ever be minted. `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_cap: Option<u64>,
    /// Units minted so far.
    #[serde(default)]
    pub minted: u64,
}

impl Item {
    /// Creates an item with nothing minted yet.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: u64, mint_cap: Option<u64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            mint_cap,
            minted: 0,
        }
    }

    /// Returns true if the mint cap has been reached.
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.mint_cap.is_some_and(|cap| self.minted >= cap)
    }

    /// Units still available, or `None` if unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.mint_cap.map(|cap| cap.saturating_sub(self.minted))
    }

    /// Supply badge, e.g. `minted 3/10000` or `minted 3/∞`.
    #[must_use]
    pub fn supply_label(&self) -> String {
        match self.mint_cap {
            Some(cap) => format!("minted {}/{cap}", self.minted),
            None => format!("minted {}/∞", self.minted),
        }
    }
}

/// A moderation report. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Globally unique report id.
    pub id: String,
    /// Reporter.
    pub user_id: String,
    /// Free-form category label.
    #[serde(rename = "type")]
    pub report_type: String,
    /// What is being reported.
    pub target_id: String,
    /// Reason text after moderation.
    pub reason: String,
    /// Whether the raw reason matched the denylist.
    pub flagged: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// The full application state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Users keyed by username.
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    /// Catalog in display order.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Global report log, oldest first.
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Snapshot {
    /// Creates an empty state seeded with a catalog.
    #[must_use]
    pub fn with_catalog(items: Vec<Item>) -> Self {
        Self {
            users: BTreeMap::new(),
            items,
            reports: Vec::new(),
        }
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Looks up an item by id for mutation.
    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }
}

/// Generates a fresh, globally unique record id.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// A clock before 1970 reads as 0 rather than failing the operation.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

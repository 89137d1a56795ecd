//! # Catalog & Economy Configuration
//!
//! The item catalog and the balance rules, loaded once at startup.
//!
//! ## Example
//!
//! ```toml
//! starting_balance = 1000
//! grant_amount = 100
//!
//! [[catalog]]
//! id = "pet_egg_basic"
//! name = "Basic Pet Egg"
//! price = 100
//! mint_cap = 10000
//! ```
//!
//! The catalog only seeds a fresh state. Once a snapshot has been saved, the
//! persisted items (with their `minted` counters) are authoritative.

use std::collections::HashSet;

use gamehub_shared::constants::{DEFAULT_GRANT_AMOUNT, DEFAULT_STARTING_BALANCE};
use gamehub_shared::Item;
use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};

/// One catalog line in the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Price. Must be positive.
    pub price: u64,
    /// Supply cap. Omit for unlimited.
    #[serde(default)]
    pub mint_cap: Option<u64>,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(id: &str, name: &str, price: u64, mint_cap: Option<u64>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            mint_cap,
        }
    }
}

/// Balance rules and the starting catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Balance of a freshly created user.
    pub starting_balance: u64,
    /// Amount added by one grant. No cap is applied to repeated grants.
    pub grant_amount: u64,
    /// Items for sale, in display order.
    pub catalog: Vec<CatalogEntry>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            grant_amount: DEFAULT_GRANT_AMOUNT,
            catalog: default_catalog(),
        }
    }
}

/// The launch catalog.
#[must_use]
pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("pet_egg_basic", "Basic Pet Egg", 100, Some(10_000)),
        CatalogEntry::new("vip_pass", "VIP Access", 500, Some(1000)),
    ]
}

impl EconomyConfig {
    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid TOML or fails validation.
    pub fn from_toml(raw: &str) -> EconomyResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks prices, caps and id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> EconomyResult<()> {
        if self.grant_amount == 0 {
            return Err(EconomyError::InvalidConfig("grant_amount must be positive".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.catalog {
            if entry.id.trim().is_empty() {
                return Err(EconomyError::InvalidConfig("catalog item with empty id".to_string()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(EconomyError::InvalidConfig(format!("duplicate catalog item: {}", entry.id)));
            }
            if entry.price == 0 {
                return Err(EconomyError::InvalidConfig(format!("{}: price must be positive", entry.id)));
            }
            if entry.mint_cap == Some(0) {
                return Err(EconomyError::InvalidConfig(format!("{}: mint_cap must be positive", entry.id)));
            }
        }
        Ok(())
    }

    /// Builds the catalog items, all with `minted = 0`.
    #[must_use]
    pub fn catalog_items(&self) -> Vec<Item> {
        self.catalog
            .iter()
            .map(|entry| Item::new(entry.id.clone(), entry.name.clone(), entry.price, entry.mint_cap))
            .collect()
    }
}

//! # Economy Ledger
//!
//! **Nothing is minted without our approval.**
//!
//! Owns balances, inventories, mint counters and receipts. Every mutation is a
//! single [`SharedState::transact`] call, so for any one purchase:
//!
//! ```text
//! lock ──> validate (item, supply, funds) ──> debit + mint + append receipt
//!                                                      │
//!                        save snapshot <───────────────┘
//!                             │
//!               Ok ──> commit, return Receipt
//!               Err ─> rollback, return Persistence error
//! ```
//!
//! The lock covers every user and every item. Contention is expected to be
//! low, and one lock makes oversell and negative balances impossible.

use std::sync::Arc;

use gamehub_shared::{new_record_id, now_millis, Item, Receipt, SharedState, Snapshot, User};

use crate::catalog::EconomyConfig;
use crate::error::{EconomyError, EconomyResult};

/// The economy ledger.
///
/// `EconomyLedger` is `Send + Sync`; share it behind an `Arc` or clone the
/// underlying [`SharedState`] handle into several ledgers.
pub struct EconomyLedger {
    /// Shared application state.
    state: Arc<SharedState>,
    /// Balance of a freshly created user.
    starting_balance: u64,
}

impl EconomyLedger {
    /// Creates a ledger over existing shared state.
    #[must_use]
    pub fn new(state: Arc<SharedState>, config: &EconomyConfig) -> Self {
        Self {
            state,
            starting_balance: config.starting_balance,
        }
    }

    /// Builds the snapshot a fresh store should start from.
    #[must_use]
    pub fn seed_snapshot(config: &EconomyConfig) -> Snapshot {
        Snapshot::with_catalog(config.catalog_items())
    }

    /// Returns the shared state handle.
    #[must_use]
    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Returns the named user, creating it with the starting balance if needed.
    ///
    /// Saves only when a user is created. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::Persistence`] if a new user could not be saved;
    /// the user is then not created.
    pub fn ensure_user(&self, name: &str) -> EconomyResult<User> {
        if let Some(user) = self.user(name) {
            return Ok(user);
        }

        let starting_balance = self.starting_balance;
        self.state.transact(|state| {
            // Another session may have created it between the read and the lock.
            let user = state
                .users
                .entry(name.to_string())
                .or_insert_with(|| {
                    tracing::info!(user = name, balance = starting_balance, "user created");
                    User::with_balance(starting_balance)
                })
                .clone();
            Ok(user)
        })
    }

    /// Buys one unit of an item at its current price.
    ///
    /// Checks run in this order: user exists, item exists, supply remains,
    /// funds suffice. On success the balance is debited, `minted` is bumped,
    /// the item is appended to the inventory and a receipt is issued, all in
    /// one committed step.
    ///
    /// # Errors
    ///
    /// - [`EconomyError::UserNotFound`] / [`EconomyError::ItemNotFound`]
    /// - [`EconomyError::SupplyExhausted`] when `minted == mint_cap`
    /// - [`EconomyError::InsufficientFunds`] when `balance < price`
    /// - [`EconomyError::Persistence`] if the result could not be saved
    ///
    /// On any error the ledger is exactly as it was before the call.
    pub fn purchase(&self, username: &str, item_id: &str) -> EconomyResult<Receipt> {
        let result = self.state.transact(|state| {
            if !state.users.contains_key(username) {
                return Err(EconomyError::UserNotFound(username.to_string()));
            }

            let (price, minted, mint_cap) = {
                let item = state
                    .item(item_id)
                    .ok_or_else(|| EconomyError::ItemNotFound(item_id.to_string()))?;
                (item.price, item.minted, item.mint_cap)
            };

            if let Some(cap) = mint_cap {
                if minted >= cap {
                    return Err(EconomyError::SupplyExhausted {
                        item_id: item_id.to_string(),
                        minted,
                        mint_cap: cap,
                    });
                }
            }
            let next_minted = minted.checked_add(1).ok_or(EconomyError::ArithmeticOverflow)?;

            let user = state
                .users
                .get_mut(username)
                .ok_or_else(|| EconomyError::UserNotFound(username.to_string()))?;
            let remaining = user
                .balance
                .checked_sub(price)
                .ok_or(EconomyError::InsufficientFunds {
                    price,
                    balance: user.balance,
                })?;

            let receipt = Receipt {
                id: new_record_id(),
                item_id: item_id.to_string(),
                amount: price,
                timestamp: now_millis(),
            };

            user.balance = remaining;
            user.inventory.push(item_id.to_string());
            user.receipts.push(receipt.clone());

            if let Some(item) = state.item_mut(item_id) {
                item.minted = next_minted;
            }

            Ok(receipt)
        });

        match &result {
            Ok(receipt) => tracing::info!(
                user = username,
                item = item_id,
                amount = receipt.amount,
                receipt = %receipt.id,
                "purchase committed"
            ),
            Err(EconomyError::Persistence(e)) => {
                tracing::warn!(user = username, item = item_id, error = %e, "purchase not saved");
            }
            Err(e) => tracing::debug!(user = username, item = item_id, reason = %e, "purchase rejected"),
        }

        result
    }

    /// Adds `amount` to a user's balance and returns the new balance.
    ///
    /// No upper bound is enforced on the balance or on how often this is called.
    ///
    /// # Errors
    ///
    /// - [`EconomyError::ZeroAmount`] if `amount` is zero; nothing is saved
    /// - [`EconomyError::UserNotFound`] for an unknown user
    /// - [`EconomyError::ArithmeticOverflow`] if the balance would exceed `u64`
    /// - [`EconomyError::Persistence`] if the result could not be saved
    pub fn grant(&self, username: &str, amount: u64) -> EconomyResult<u64> {
        if amount == 0 {
            return Err(EconomyError::ZeroAmount);
        }

        let balance = self.state.transact(|state| {
            let user = state
                .users
                .get_mut(username)
                .ok_or_else(|| EconomyError::UserNotFound(username.to_string()))?;
            user.balance = user.balance.checked_add(amount).ok_or(EconomyError::ArithmeticOverflow)?;
            Ok::<_, EconomyError>(user.balance)
        })?;

        tracing::info!(user = username, amount, balance, "grant committed");
        Ok(balance)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Returns a copy of a user, if it exists.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<User> {
        self.state.read(|state| state.users.get(name).cloned())
    }

    /// Returns a user's balance.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UserNotFound`] for an unknown user.
    pub fn balance(&self, name: &str) -> EconomyResult<u64> {
        self.state
            .read(|state| state.users.get(name).map(|u| u.balance))
            .ok_or_else(|| EconomyError::UserNotFound(name.to_string()))
    }

    /// Returns a user's receipts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UserNotFound`] for an unknown user.
    pub fn receipts_newest_first(&self, name: &str) -> EconomyResult<Vec<Receipt>> {
        self.state
            .read(|state| {
                state
                    .users
                    .get(name)
                    .map(|u| u.receipts.iter().rev().cloned().collect())
            })
            .ok_or_else(|| EconomyError::UserNotFound(name.to_string()))
    }

    /// Returns the catalog in display order, with current mint counters.
    #[must_use]
    pub fn catalog(&self) -> Vec<Item> {
        self.state.read(|state| state.items.clone())
    }

    /// Returns one catalog item.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<Item> {
        self.state.read(|state| state.item(item_id).cloned())
    }

    /// Number of known users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.read(|state| state.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use gamehub_shared::MemoryStore;

    fn ledger_with(catalog: Vec<CatalogEntry>) -> (Arc<MemoryStore>, EconomyLedger) {
        let config = EconomyConfig {
            catalog,
            ..EconomyConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let state = SharedState::open(store.clone(), || EconomyLedger::seed_snapshot(&config)).unwrap();
        (store, EconomyLedger::new(Arc::new(state), &config))
    }

    fn default_ledger() -> (Arc<MemoryStore>, EconomyLedger) {
        ledger_with(crate::catalog::default_catalog())
    }

    #[test]
    fn test_ensure_user_creates_once() {
        let (store, ledger) = default_ledger();

        let alice = ledger.ensure_user("alice").unwrap();
        assert_eq!(alice.balance, 1000);
        assert!(alice.inventory.is_empty());
        assert!(alice.receipts.is_empty());
        assert_eq!(store.save_count(), 1);

        ledger.ensure_user("alice").unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(ledger.user_count(), 1);
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();
        ledger.ensure_user("Alice").unwrap();
        assert_eq!(ledger.user_count(), 2);
    }

    #[test]
    fn test_golden_path_purchase() {
        let (store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();

        let receipt = ledger.purchase("alice", "pet_egg_basic").unwrap();

        assert_eq!(receipt.item_id, "pet_egg_basic");
        assert_eq!(receipt.amount, 100);
        assert_eq!(ledger.balance("alice").unwrap(), 900);
        assert_eq!(ledger.item("pet_egg_basic").unwrap().minted, 1);

        let alice = ledger.user("alice").unwrap();
        assert_eq!(alice.inventory, vec!["pet_egg_basic".to_string()]);
        assert_eq!(alice.receipts, vec![receipt]);

        // The saved snapshot is the committed one.
        assert_eq!(store.saved(), Some(ledger.state().snapshot()));
    }

    #[test]
    fn test_sold_out_leaves_state_unchanged() {
        let (_store, ledger) = ledger_with(vec![CatalogEntry::new("crown", "Crown", 10, Some(1))]);
        ledger.ensure_user("alice").unwrap();
        ledger.ensure_user("bob").unwrap();
        ledger.purchase("alice", "crown").unwrap();

        let before = ledger.state().snapshot();
        let err = ledger.purchase("bob", "crown").unwrap_err();

        assert!(matches!(
            err,
            EconomyError::SupplyExhausted { minted: 1, mint_cap: 1, .. }
        ));
        assert_eq!(ledger.state().snapshot(), before);
    }

    #[test]
    fn test_insufficient_funds() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();

        ledger.purchase("alice", "vip_pass").unwrap();
        ledger.purchase("alice", "vip_pass").unwrap();
        let before = ledger.state().snapshot();

        let err = ledger.purchase("alice", "pet_egg_basic").unwrap_err();
        assert!(matches!(err, EconomyError::InsufficientFunds { price: 100, balance: 0 }));
        assert_eq!(ledger.state().snapshot(), before);
    }

    #[test]
    fn test_supply_checked_before_funds() {
        let (_store, ledger) = ledger_with(vec![CatalogEntry::new("crown", "Crown", 5000, Some(1))]);
        ledger.ensure_user("rich").unwrap();
        ledger.grant("rich", 5000).unwrap();
        ledger.purchase("rich", "crown").unwrap();
        ledger.ensure_user("poor").unwrap();

        assert!(matches!(
            ledger.purchase("poor", "crown"),
            Err(EconomyError::SupplyExhausted { .. })
        ));
    }

    #[test]
    fn test_unknown_references() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();

        let err = ledger.purchase("alice", "unicorn").unwrap_err();
        assert!(matches!(err, EconomyError::ItemNotFound(ref id) if id == "unicorn"));
        assert!(err.is_not_found());

        let err = ledger.purchase("mallory", "pet_egg_basic").unwrap_err();
        assert!(matches!(err, EconomyError::UserNotFound(_)));

        assert!(matches!(ledger.grant("mallory", 100), Err(EconomyError::UserNotFound(_))));
        assert!(ledger.balance("mallory").is_err());
    }

    #[test]
    fn test_grant_has_no_cap() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();

        for _ in 0..50 {
            ledger.grant("alice", 100).unwrap();
        }
        assert_eq!(ledger.balance("alice").unwrap(), 6000);
    }

    #[test]
    fn test_zero_grant_rejected_without_save() {
        let (store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();
        let saves = store.save_count();

        assert!(matches!(ledger.grant("alice", 0), Err(EconomyError::ZeroAmount)));
        assert_eq!(store.save_count(), saves);
        assert_eq!(ledger.balance("alice").unwrap(), 1000);
    }

    #[test]
    fn test_grant_overflow() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();

        let err = ledger.grant("alice", u64::MAX).unwrap_err();
        assert!(matches!(err, EconomyError::ArithmeticOverflow));
        assert_eq!(ledger.balance("alice").unwrap(), 1000);
    }

    #[test]
    fn test_persistence_failure_is_not_committed() {
        let (store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();
        let before = ledger.state().snapshot();

        store.set_fail_writes(true);
        let err = ledger.purchase("alice", "pet_egg_basic").unwrap_err();
        assert!(matches!(err, EconomyError::Persistence(_)));
        assert!(matches!(ledger.grant("alice", 100), Err(EconomyError::Persistence(_))));
        assert!(matches!(ledger.ensure_user("bob"), Err(EconomyError::Persistence(_))));

        assert_eq!(ledger.state().snapshot(), before);

        store.set_fail_writes(false);
        ledger.purchase("alice", "pet_egg_basic").unwrap();
        assert_eq!(ledger.balance("alice").unwrap(), 900);
    }

    #[test]
    fn test_receipts_newest_first() {
        let (_store, ledger) = default_ledger();
        ledger.ensure_user("alice").unwrap();
        ledger.purchase("alice", "pet_egg_basic").unwrap();
        ledger.purchase("alice", "vip_pass").unwrap();

        let receipts = ledger.receipts_newest_first("alice").unwrap();
        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0].item_id, "vip_pass");
        assert_eq!(receipts[1].item_id, "pet_egg_basic");
        assert_ne!(receipts[0].id, receipts[1].id);
    }

    #[test]
    fn test_unlimited_item() {
        let (_store, ledger) = ledger_with(vec![CatalogEntry::new("sticker", "Sticker", 1, None)]);
        ledger.ensure_user("alice").unwrap();

        for _ in 0..1000 {
            ledger.purchase("alice", "sticker").unwrap();
        }
        let item = ledger.item("sticker").unwrap();
        assert_eq!(item.minted, 1000);
        assert_eq!(ledger.balance("alice").unwrap(), 0);
        assert_eq!(ledger.user("alice").unwrap().count_item("sticker"), 1000);
    }
}

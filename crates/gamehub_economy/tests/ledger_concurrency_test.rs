//! Integration tests for the ledger under concurrent purchasers.
//!
//! Run with: cargo test --package gamehub_economy --test ledger_concurrency_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use gamehub_economy::{CatalogEntry, EconomyConfig, EconomyError, EconomyLedger};
use gamehub_shared::{JsonFileStore, MemoryStore, PersistentStore, SharedState};
use proptest::prelude::*;

fn temp_state_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_ledger_{id}.json"))
}

fn ledger_over(store: Arc<dyn PersistentStore>, config: &EconomyConfig) -> EconomyLedger {
    let state = SharedState::open(store, || EconomyLedger::seed_snapshot(config)).unwrap();
    EconomyLedger::new(Arc::new(state), config)
}

fn config_with(catalog: Vec<CatalogEntry>) -> EconomyConfig {
    EconomyConfig {
        catalog,
        ..EconomyConfig::default()
    }
}

#[test]
fn test_cap_one_exactly_one_winner() {
    let config = config_with(vec![CatalogEntry::new("crown", "Crown", 100, Some(1))]);
    let ledger = Arc::new(ledger_over(Arc::new(MemoryStore::new()), &config));

    let purchasers = 32;
    for i in 0..purchasers {
        ledger.ensure_user(&format!("player_{i}")).unwrap();
    }

    let barrier = Arc::new(Barrier::new(purchasers));
    let successes = Arc::new(AtomicUsize::new(0));
    let sold_out = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..purchasers)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            let successes = Arc::clone(&successes);
            let sold_out = Arc::clone(&sold_out);

            thread::spawn(move || {
                barrier.wait();
                match ledger.purchase(&format!("player_{i}"), "crown") {
                    Ok(_) => {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(EconomyError::SupplyExhausted { .. }) => {
                        sold_out.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(sold_out.load(Ordering::SeqCst), purchasers - 1);
    assert_eq!(ledger.item("crown").unwrap().minted, 1);

    let snapshot = ledger.state().snapshot();
    let owners = snapshot.users.values().filter(|u| u.count_item("crown") == 1).count();
    assert_eq!(owners, 1);
}

#[test]
fn test_cap_never_exceeded_with_many_buyers() {
    let config = config_with(vec![CatalogEntry::new("egg", "Egg", 1, Some(50))]);
    let ledger = Arc::new(ledger_over(Arc::new(MemoryStore::new()), &config));

    let threads = 8;
    let attempts_per_thread = 20;
    for t in 0..threads {
        ledger.ensure_user(&format!("player_{t}")).unwrap();
    }

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let name = format!("player_{t}");
                (0..attempts_per_thread)
                    .filter(|_| ledger.purchase(&name, "egg").is_ok())
                    .count()
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(total, 50);
    assert_eq!(ledger.item("egg").unwrap().minted, 50);

    let snapshot = ledger.state().snapshot();
    let receipts: usize = snapshot.users.values().map(|u| u.receipts.len()).sum();
    assert_eq!(receipts, 50);
}

#[test]
fn test_same_user_concurrent_spend_never_negative() {
    // 1000 starting balance, 100 per unit: exactly 10 of 40 attempts may land.
    let config = config_with(vec![CatalogEntry::new("egg", "Egg", 100, None)]);
    let ledger = Arc::new(ledger_over(Arc::new(MemoryStore::new()), &config));
    ledger.ensure_user("alice").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || (0..10).filter(|_| ledger.purchase("alice", "egg").is_ok()).count())
        })
        .collect();

    let bought: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(bought, 10);
    assert_eq!(ledger.balance("alice").unwrap(), 0);
}

#[test]
fn test_receipt_amount_survives_price_change() {
    let path = temp_state_path();
    let config = config_with(vec![CatalogEntry::new("pet_egg_basic", "Basic Pet Egg", 100, Some(10_000))]);

    {
        let ledger = ledger_over(Arc::new(JsonFileStore::new(&path)), &config);
        ledger.ensure_user("alice").unwrap();
        ledger.purchase("alice", "pet_egg_basic").unwrap();
    }

    // Edit the catalog price in the saved document.
    let store = JsonFileStore::new(&path);
    let mut saved = store.load().unwrap().unwrap();
    saved.item_mut("pet_egg_basic").unwrap().price = 250;
    store.save(&saved).unwrap();

    let ledger = ledger_over(Arc::new(JsonFileStore::new(&path)), &config);
    ledger.purchase("alice", "pet_egg_basic").unwrap();

    let receipts = ledger.receipts_newest_first("alice").unwrap();
    assert_eq!(receipts[0].amount, 250);
    assert_eq!(receipts[1].amount, 100);
    assert_eq!(ledger.balance("alice").unwrap(), 650);
    assert_eq!(ledger.item("pet_egg_basic").unwrap().minted, 2);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_state_survives_restart() {
    let path = temp_state_path();
    let config = EconomyConfig::default();

    let before = {
        let ledger = ledger_over(Arc::new(JsonFileStore::new(&path)), &config);
        ledger.ensure_user("alice").unwrap();
        ledger.purchase("alice", "vip_pass").unwrap();
        ledger.grant("alice", 100).unwrap();
        ledger.state().snapshot()
    };

    let reopened = ledger_over(Arc::new(JsonFileStore::new(&path)), &config);
    assert_eq!(reopened.state().snapshot(), before);
    assert_eq!(reopened.balance("alice").unwrap(), 600);

    std::fs::remove_file(&path).ok();
}

#[derive(Clone, Debug)]
enum Action {
    Buy(usize),
    Grant,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0usize..3).prop_map(Action::Buy),
        1 => Just(Action::Grant),
    ]
}

proptest! {
    #[test]
    fn prop_balance_and_supply_invariants(actions in proptest::collection::vec(action(), 1..80)) {
        let config = config_with(vec![
            CatalogEntry::new("cheap", "Cheap", 30, None),
            CatalogEntry::new("capped", "Capped", 70, Some(3)),
            CatalogEntry::new("pricey", "Pricey", 450, Some(5)),
        ]);
        let ledger = ledger_over(Arc::new(MemoryStore::new()), &config);
        ledger.ensure_user("alice").unwrap();
        let ids = ["cheap", "capped", "pricey"];

        let mut spent = 0u64;
        let mut granted = 0u64;
        for action in actions {
            match action {
                Action::Buy(i) => {
                    let before = ledger.state().snapshot();
                    match ledger.purchase("alice", ids[i]) {
                        Ok(receipt) => {
                            prop_assert_eq!(receipt.amount, before.item(ids[i]).unwrap().price);
                            spent += receipt.amount;
                        }
                        Err(_) => {
                            prop_assert_eq!(ledger.state().snapshot(), before);
                        }
                    }
                }
                Action::Grant => {
                    ledger.grant("alice", 100).unwrap();
                    granted += 100;
                }
            }

            for item in ledger.catalog() {
                if let Some(cap) = item.mint_cap {
                    prop_assert!(item.minted <= cap);
                }
            }
        }

        prop_assert_eq!(ledger.balance("alice").unwrap(), 1000 + granted - spent);
    }
}

//! # Game Hub
//!
//! Opens the saved state, builds every service over it and hands out client
//! sessions.
//!
//! ```text
//! GameHub::open(config)
//!     │
//!     ├─ JsonFileStore(config.storage.path)
//!     ├─ SharedState  (saved snapshot, or the catalog seed)
//!     ├─ EconomyLedger ─┐
//!     ├─ ReportLog ─────┴─ both mutate through SharedState
//!     ├─ ModerationFilter (shared by chat and reports)
//!     └─ InProcessHub    (room transport)
//! ```

use std::sync::Arc;

use gamehub_economy::EconomyLedger;
use gamehub_networking::{DeliveryStats, InProcessHub, RoomTransport};
use gamehub_security::{ModerationFilter, ReportLog};
use gamehub_shared::{Item, JsonFileStore, PersistentStore, Report, SharedState};

use crate::config::HubConfig;
use crate::error::HubResult;
use crate::session::ClientSession;

/// Everything a session needs, shared by all sessions of one hub.
pub(crate) struct Services {
    /// Validated configuration.
    pub(crate) config: HubConfig,
    /// Balances, items, receipts.
    pub(crate) ledger: EconomyLedger,
    /// Moderated reports.
    pub(crate) reports: ReportLog,
    /// Chat filter.
    pub(crate) filter: Arc<ModerationFilter>,
    /// Room backend.
    pub(crate) transport: Arc<dyn RoomTransport>,
}

/// The application root.
///
/// Cheap to clone; clones share the same state and rooms.
#[derive(Clone)]
pub struct GameHub {
    /// Shared services.
    services: Arc<Services>,
}

impl GameHub {
    /// Opens a hub over the configured JSON state file with an in-process
    /// room transport.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or the state file exists but
    /// cannot be read.
    pub fn open(config: HubConfig) -> HubResult<Self> {
        let store: Arc<dyn PersistentStore> = Arc::new(JsonFileStore::new(&config.storage.path));
        let transport: Arc<dyn RoomTransport> = Arc::new(InProcessHub::new(config.messaging.inbox_capacity));
        Self::with_store(config, store, transport)
    }

    /// Opens a hub over an explicit store and room transport.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or the store cannot be read.
    pub fn with_store(
        config: HubConfig,
        store: Arc<dyn PersistentStore>,
        transport: Arc<dyn RoomTransport>,
    ) -> HubResult<Self> {
        config.validate()?;

        let state = Arc::new(SharedState::open(store, || EconomyLedger::seed_snapshot(&config.economy))?);
        let filter = Arc::new(ModerationFilter::new(&config.moderation)?);
        let ledger = EconomyLedger::new(Arc::clone(&state), &config.economy);
        let reports = ReportLog::new(state, Arc::clone(&filter));

        tracing::info!(
            items = ledger.catalog().len(),
            users = ledger.user_count(),
            reports = reports.len(),
            denylist = filter.term_count(),
            "hub ready"
        );

        Ok(Self {
            services: Arc::new(Services {
                config,
                ledger,
                reports,
                filter,
                transport,
            }),
        })
    }

    /// Creates a new client session with no profile.
    #[must_use]
    pub fn session(&self) -> ClientSession {
        ClientSession::new(Arc::clone(&self.services))
    }

    /// Catalog items with their current mint counters, in display order.
    #[must_use]
    pub fn catalog(&self) -> Vec<Item> {
        self.services.ledger.catalog()
    }

    /// Every report, newest first.
    #[must_use]
    pub fn reports_newest_first(&self) -> Vec<Report> {
        self.services.reports.newest_first()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.services.config
    }

    /// The ledger.
    #[must_use]
    pub fn ledger(&self) -> &EconomyLedger {
        &self.services.ledger
    }

    /// The report log.
    #[must_use]
    pub fn report_log(&self) -> &ReportLog {
        &self.services.reports
    }

    /// The shared chat and report filter.
    #[must_use]
    pub fn filter(&self) -> &ModerationFilter {
        &self.services.filter
    }

    /// Room delivery counters.
    #[must_use]
    pub fn delivery_stats(&self) -> DeliveryStats {
        self.services.transport.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamehub_shared::MemoryStore;

    fn memory_hub() -> (GameHub, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let hub = GameHub::with_store(
            HubConfig::default(),
            store.clone(),
            Arc::new(InProcessHub::default()),
        )
        .unwrap();
        (hub, store)
    }

    #[test]
    fn test_fresh_hub_is_seeded_but_not_saved() {
        let (hub, store) = memory_hub();
        let catalog = hub.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "pet_egg_basic");
        assert_eq!(store.save_count(), 0);
        assert!(hub.reports_newest_first().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = HubConfig::default();
        config.messaging.inbox_capacity = 0;
        let result = GameHub::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(InProcessHub::default()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let (hub, _store) = memory_hub();
        let other = hub.clone();

        let mut session = hub.session();
        session.login("alice").unwrap();
        session.buy("vip_pass").unwrap();

        assert_eq!(other.ledger().balance("alice").unwrap(), 500);
        assert_eq!(other.catalog()[1].minted, 1);
    }

    #[test]
    fn test_persisted_catalog_wins_over_config() {
        let store = Arc::new(MemoryStore::new());
        {
            let hub = GameHub::with_store(HubConfig::default(), store.clone(), Arc::new(InProcessHub::default()))
                .unwrap();
            let mut session = hub.session();
            session.login("alice").unwrap();
            session.buy("pet_egg_basic").unwrap();
        }

        let mut config = HubConfig::default();
        config.economy.catalog[0].price = 999;
        let hub = GameHub::with_store(config, store, Arc::new(InProcessHub::default())).unwrap();

        assert_eq!(hub.catalog()[0].price, 100);
        assert_eq!(hub.catalog()[0].minted, 1);
    }
}

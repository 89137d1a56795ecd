//! # Defaults
//!
//! Values used when the config file leaves a setting out.

// =============================================================================
// ECONOMY
// =============================================================================

/// Balance given to a user the first time their name is referenced.
pub const DEFAULT_STARTING_BALANCE: u64 = 1000;

/// Amount added to a balance by a single grant.
pub const DEFAULT_GRANT_AMOUNT: u64 = 100;

// =============================================================================
// MODERATION
// =============================================================================

/// Replacement written over every denylisted match.
pub const DEFAULT_MASK: &str = "****";

/// Placeholder denylist. The matching mechanism is the contract, not the words.
pub const DEFAULT_DENYLIST: [&str; 3] = ["badword", "slur1", "slur2"];

/// Report category used when the reporter leaves it blank.
pub const DEFAULT_REPORT_TYPE: &str = "chat";

/// Report target used when the reporter leaves it blank.
pub const DEFAULT_REPORT_TARGET: &str = "unknown";

// =============================================================================
// MESSAGING
// =============================================================================

/// Room joined when the caller leaves the room id blank.
pub const DEFAULT_ROOM: &str = "room-1";

/// Per-subscriber inbox size. A full inbox drops new events.
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Rendered chat lines kept per session. Older lines are discarded.
pub const DEFAULT_CHAT_LOG_CAPACITY: usize = 500;

/// Profile name used when login is called with a blank name.
pub const GUEST_NAME: &str = "guest";

// =============================================================================
// STORAGE
// =============================================================================

/// Snapshot file written by the JSON store.
pub const DEFAULT_STATE_FILE: &str = "gamehub_state_v1.json";

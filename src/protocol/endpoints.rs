//! Gateway endpoint paths.

/// Semantic recall.
pub const RECALL: &str = "/memory/recall";

/// Store a memory (also used by learn and set-identity).
pub const STORE: &str = "/memory/store";

/// Identity profile.
pub const IDENTITY: &str = "/memory/identity";

/// Memory branches.
pub const BRANCH: &str = "/memory/branch";

/// Status and context.
pub const STATUS: &str = "/memory/status";

/// End-of-session sync.
pub const SYNC: &str = "/memory/sync";

/// Restore from the chain snapshot.
pub const SYNC_LOAD: &str = "/memory/sync/load";

/// Subscription and entitlement check.
pub const SUBSCRIBE: &str = "/memory/subscribe";

/// Collection holding the actions currently scheduled on a server
pub const ACTIVE_ACTIONS_COLLECTION: &str = "active_actions";

/// Collection recording finished operations, purged by a TTL index
pub const COMPLETED_OPERATIONS_COLLECTION: &str = "completed_operations";

/// Collection of cache version markers keyed by cache name
pub const CACHE_VERSION_COLLECTION: &str = "cache_version";

/// `completed_operations` documents expire one day after `created_at`
pub const COMPLETED_OPERATIONS_TTL_SECS: u64 = 86_400;

/// Server error codes surfaced by index creation and writes
pub const NAMESPACE_NOT_FOUND_CODE: i32 = 26;
pub const INDEX_OPTIONS_CONFLICT_CODE: i32 = 85;
pub const INDEX_KEY_SPECS_CONFLICT_CODE: i32 = 86;
pub const DUPLICATE_KEY_CODE: i32 = 11000;

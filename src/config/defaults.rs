//! Default values for permview configuration.

/// Filter quiet period in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Largest accepted filter quiet period in milliseconds.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Snapshot file looked for in the working directory when no path is given.
pub const DEFAULT_DATA_FILE: &str = "UserPermissions.json";

/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// PARKING CONSTANTS
// =============================================================================

/// Spots per letter group when generating labels (A1..A10, B1..B10, ...)
pub const SPOTS_PER_LABEL_GROUP: u32 = 10;

/// Upper bound on spots per lot accepted at creation time
pub const MAX_SPOTS_PER_LOT: u32 = 1000;

/// Trailing window (days) used by the dashboard charts and the
/// "recent reservations" summary figure
pub const CHART_WINDOW_DAYS: i64 = 7;

//! Limit/offset pagination shared by list endpoints.

use serde::Serialize;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Upper bound on a single page.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// `{ "items": [...], "count": n }` envelope, where `count` is the total
/// number of rows regardless of the requested window.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub count: i64,
}

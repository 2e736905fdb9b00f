//! Limit clamping for list endpoints.

/// Default number of simulations returned by the history view.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Upper bound on a single history page.
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Clamp a user-provided limit into `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

//! Rotation policy and cursor arithmetic.
//!
//! The rotation cursor is a persisted index into a content item's
//! eligible-video ordering (by `order_index`). The functions here only do the
//! arithmetic; loading the ordering, filtering by eligibility, and persisting
//! the advanced cursor are repository concerns.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How a content item cycles through its eligible videos.
///
/// Stored as TEXT in the database and carried as a lowercase string over the
/// API; [`RotationPolicy::parse`] rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Always the first eligible video. The cursor is never advanced.
    None,
    /// Advance one video per selection, stopping at the last.
    Sequential,
    /// Advance one video per selection, wrapping back to the first.
    Cyclic,
}

impl RotationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RotationPolicy::None => "none",
            RotationPolicy::Sequential => "sequential",
            RotationPolicy::Cyclic => "cyclic",
        }
    }

    /// Parse the stored/API representation.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "none" => Ok(RotationPolicy::None),
            "sequential" => Ok(RotationPolicy::Sequential),
            "cyclic" => Ok(RotationPolicy::Cyclic),
            other => Err(CoreError::Validation(format!(
                "Unknown rotation policy '{other}' (expected none, sequential, or cyclic)"
            ))),
        }
    }
}

impl std::fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RotationPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RotationPolicy::parse(s)
    }
}

/// Clamp a stored cursor into `[0, n-1]`.
///
/// The stored value can be out of range when videos were removed or expired
/// since it was last written. Returns `None` when there is nothing to point
/// at (`n == 0`).
pub fn clamp_cursor(cursor: i32, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let max = n - 1;
    Some((cursor.max(0) as usize).min(max))
}

/// The cursor value to persist after a rotation-path selection returned the
/// video at `current` out of `n` eligible videos.
///
/// `none` holds position, `sequential` saturates at the last index, `cyclic`
/// wraps to the first.
pub fn advance_cursor(policy: RotationPolicy, current: usize, n: usize) -> usize {
    debug_assert!(n > 0 && current < n);
    match policy {
        RotationPolicy::None => current,
        RotationPolicy::Sequential => (current + 1).min(n - 1),
        RotationPolicy::Cyclic => (current + 1) % n,
    }
}

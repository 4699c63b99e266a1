//! Content item entity model, selection result type, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use spotlight_core::selection::SelectionSource;
use spotlight_core::types::{DbId, Timestamp};

/// A row from the `content_items` table.
///
/// `rotation_policy` is stored as TEXT (`none | sequential | cyclic`); the
/// selection path parses it via `RotationPolicy::parse`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentItem {
    pub id: DbId,
    pub title: String,
    pub rotation_policy: String,
    /// Manual pin. When set, references one of this item's own videos.
    pub active_video_id: Option<DbId>,
    /// Persisted index into the eligible-video ordering.
    pub rotation_cursor: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a content item.
#[derive(Debug, Deserialize)]
pub struct CreateContentItem {
    pub title: String,
}

/// DTO for the set-active (manual pin) mutation.
#[derive(Debug, Deserialize)]
pub struct SetActiveVideo {
    pub video_id: DbId,
}

/// DTO for the set-rotation-policy mutation.
#[derive(Debug, Deserialize)]
pub struct SetRotationPolicy {
    pub policy: String,
}

/// Result of an active-video selection (computed, not a DB row).
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub video_id: DbId,
    /// Which step of the priority chain answered: `schedule`, `pinned`, or
    /// `rotation`.
    pub source: SelectionSource,
    /// Set when `source` is `schedule`.
    pub schedule_id: Option<DbId>,
    /// Remaining seconds until the selected video expires, when it has an
    /// expiry. Client display only.
    pub expires_in_secs: Option<i64>,
}

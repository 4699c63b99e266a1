//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use spotlight_core::types::{DbId, Timestamp};

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub content_item_id: DbId,
    /// Stable rotation ordering key, assigned on attach (upload sequence).
    pub order_index: i32,
    /// True for at most one video per content item; enforced by the
    /// set-active transaction, not by the schema.
    pub is_pinned: bool,
    /// When set and in the past, the video is ineligible for selection.
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for attaching a video to a content item.
///
/// `order_index` is normally left unset and auto-assigned as max + 1 within
/// the content item.
#[derive(Debug, Deserialize)]
pub struct CreateVideo {
    pub order_index: Option<i32>,
}

//! Schedule entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use spotlight_core::types::{DbId, Timestamp};

/// A row from the `schedules` table.
///
/// The window is half-open: the video is forced live while
/// `start_time <= now < end_time`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Schedule {
    pub id: DbId,
    pub video_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a schedule under a video.
#[derive(Debug, Deserialize)]
pub struct CreateSchedule {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub description: Option<String>,
}

/// DTO for updating a schedule. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateSchedule {
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub description: Option<String>,
}

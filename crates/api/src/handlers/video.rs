//! Handlers for the `/videos` resource and its nested schedules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use spotlight_core::error::CoreError;
use spotlight_core::subscription::SubscriptionInput;
use spotlight_core::types::DbId;
use spotlight_db::models::schedule::{CreateSchedule, Schedule};
use spotlight_db::models::video::Video;
use spotlight_db::repositories::{ScheduleRepo, VideoRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/videos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Video>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Video",
            id,
        })?;
    Ok(Json(video))
}

/// DELETE /api/v1/videos/{id}
///
/// Schedules cascade; a pinned video also clears the owning item's
/// `active_video_id` and resets its rotation cursor.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    VideoRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/videos/{id}/subscription
///
/// Accepts `{"preset": "1y" | "2y"}` or `{"until": <ISO-8601>}`. Writing an
/// expiry that is not in the future un-pins the video atomically.
pub async fn set_subscription(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubscriptionInput>,
) -> AppResult<Json<Video>> {
    let now = Utc::now();
    let expires_at = input.resolve_expiry(now)?;
    let video = VideoRepo::set_subscription(&state.pool, id, expires_at, now).await?;
    Ok(Json(video))
}

/// GET /api/v1/videos/{id}/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Schedule>>> {
    let schedules = ScheduleRepo::list_by_video(&state.pool, id).await?;
    Ok(Json(schedules))
}

/// POST /api/v1/videos/{id}/schedules
///
/// Returns 409 with code `CONFLICT` when the window overlaps any schedule
/// of the same content item.
pub async fn create_schedule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSchedule>,
) -> AppResult<(StatusCode, Json<Schedule>)> {
    let schedule = ScheduleRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

//! Handlers for the `/content-items` resource, including the selection read
//! and the pin/policy mutations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use spotlight_core::error::CoreError;
use spotlight_core::rotation::RotationPolicy;
use spotlight_core::types::DbId;
use spotlight_db::models::content_item::{
    ContentItem, CreateContentItem, SelectionResult, SetActiveVideo, SetRotationPolicy,
};
use spotlight_db::models::schedule::Schedule;
use spotlight_db::models::video::{CreateVideo, Video};
use spotlight_db::repositories::{ContentItemRepo, ScheduleRepo, SelectionRepo, VideoRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/content-items
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateContentItem>,
) -> AppResult<(StatusCode, Json<ContentItem>)> {
    let item = ContentItemRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/content-items
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ContentItem>>> {
    let items = ContentItemRepo::list(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/v1/content-items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ContentItem>> {
    let item = ContentItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ContentItem",
            id,
        })?;
    Ok(Json(item))
}

/// DELETE /api/v1/content-items/{id}
///
/// Videos and their schedules cascade.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ContentItemRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "ContentItem",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/content-items/{id}/active-video
///
/// The viewer-facing selection read. Runs the Schedule -> Pin -> Rotation
/// priority chain; a rotation-sourced answer advances the persisted cursor.
/// Responds 404 with code `NO_ELIGIBLE_VIDEO` when nothing playable exists.
pub async fn get_active_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SelectionResult>> {
    let result = SelectionRepo::get_active_video(&state.pool, id, Utc::now()).await?;
    Ok(Json(result))
}

/// PATCH /api/v1/content-items/{id}/active-video
///
/// Manually pin a video. Un-pins any sibling in the same transaction.
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetActiveVideo>,
) -> AppResult<Json<ContentItem>> {
    let item = ContentItemRepo::set_active(&state.pool, id, input.video_id).await?;
    Ok(Json(item))
}

/// PATCH /api/v1/content-items/{id}/rotation-policy
///
/// Validates the policy name and resets the rotation cursor.
pub async fn set_rotation_policy(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRotationPolicy>,
) -> AppResult<Json<ContentItem>> {
    let policy = RotationPolicy::parse(&input.policy)?;
    let item = ContentItemRepo::set_rotation_policy(&state.pool, id, policy).await?;
    Ok(Json(item))
}

/// GET /api/v1/content-items/{id}/videos
///
/// List the item's videos in rotation order.
pub async fn list_videos(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Video>>> {
    let videos = VideoRepo::list_by_content_item(&state.pool, id).await?;
    Ok(Json(videos))
}

/// POST /api/v1/content-items/{id}/videos
///
/// Attach a video; `order_index` is auto-assigned unless supplied.
pub async fn create_video(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateVideo>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let video = VideoRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// GET /api/v1/content-items/{id}/schedules
///
/// Every schedule across the item's videos, ordered by start time.
pub async fn list_schedules(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Schedule>>> {
    let schedules = ScheduleRepo::list_by_content_item(&state.pool, id).await?;
    Ok(Json(schedules))
}

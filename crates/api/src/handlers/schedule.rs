//! Handlers for the `/schedules` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use spotlight_core::error::CoreError;
use spotlight_core::types::DbId;
use spotlight_db::models::schedule::{Schedule, UpdateSchedule};
use spotlight_db::repositories::ScheduleRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/schedules/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Schedule>> {
    let schedule = ScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Schedule",
            id,
        })?;
    Ok(Json(schedule))
}

/// PATCH /api/v1/schedules/{id}
///
/// Re-validates the merged window and re-runs the overlap check (excluding
/// this schedule) inside the write transaction.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSchedule>,
) -> AppResult<Json<Schedule>> {
    let schedule = ScheduleRepo::update(&state.pool, id, &input).await?;
    Ok(Json(schedule))
}

/// DELETE /api/v1/schedules/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = ScheduleRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "Schedule",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

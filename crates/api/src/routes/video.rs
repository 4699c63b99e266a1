//! Route definitions for videos and their nested schedules.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /{id}               get_by_id
/// DELETE /{id}               delete
/// PATCH  /{id}/subscription  set_subscription
/// GET    /{id}/schedules     list_schedules
/// POST   /{id}/schedules     create_schedule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(video::get_by_id).delete(video::delete))
        .route("/{id}/subscription", patch(video::set_subscription))
        .route(
            "/{id}/schedules",
            get(video::list_schedules).post(video::create_schedule),
        )
}

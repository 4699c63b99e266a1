//! Route definitions for content items and their nested resources.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::content_item;
use crate::state::AppState;

/// Routes mounted at `/content-items`.
///
/// ```text
/// GET    /                           list
/// POST   /                           create
/// GET    /{id}                       get_by_id
/// DELETE /{id}                       delete
/// GET    /{id}/active-video          get_active_video
/// PATCH  /{id}/active-video          set_active
/// PATCH  /{id}/rotation-policy       set_rotation_policy
/// GET    /{id}/videos                list_videos
/// POST   /{id}/videos                create_video
/// GET    /{id}/schedules             list_schedules
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content_item::list).post(content_item::create))
        .route(
            "/{id}",
            get(content_item::get_by_id).delete(content_item::delete),
        )
        .route(
            "/{id}/active-video",
            get(content_item::get_active_video).patch(content_item::set_active),
        )
        .route(
            "/{id}/rotation-policy",
            patch(content_item::set_rotation_policy),
        )
        .route(
            "/{id}/videos",
            get(content_item::list_videos).post(content_item::create_video),
        )
        .route("/{id}/schedules", get(content_item::list_schedules))
}

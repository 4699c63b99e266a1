//! Route definitions for schedules.

use axum::routing::get;
use axum::Router;

use crate::handlers::schedule;
use crate::state::AppState;

/// Routes mounted at `/schedules`.
///
/// ```text
/// GET    /{id}   get_by_id
/// PATCH  /{id}   update
/// DELETE /{id}   delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(schedule::get_by_id)
            .patch(schedule::update)
            .delete(schedule::delete),
    )
}

//! Route definitions.

pub mod content_item;
pub mod health;
pub mod schedule;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /content-items                           list, create
/// /content-items/{id}                      get, delete
/// /content-items/{id}/active-video         selection read (GET), pin (PATCH)
/// /content-items/{id}/rotation-policy      set policy (PATCH)
/// /content-items/{id}/videos               list, attach
/// /content-items/{id}/schedules            schedules across the item (GET)
///
/// /videos/{id}                             get, delete
/// /videos/{id}/subscription                set expiry (PATCH)
/// /videos/{id}/schedules                   list, create
///
/// /schedules/{id}                          get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/content-items", content_item::router())
        .nest("/videos", video::router())
        .nest("/schedules", schedule::router())
}

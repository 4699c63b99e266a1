//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers stay thin: they resolve "now", delegate to the corresponding
//! repository in `spotlight_db`, and map errors via [`crate::error::AppError`].

pub mod content_item;
pub mod schedule;
pub mod video;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Operations that enforce engine
//! invariants (single pin, schedule overlap, cursor advancement) open a
//! transaction and lock the owning content item row first; see
//! `ContentItemRepo::lock_for_update`.

pub mod content_item_repo;
pub mod schedule_repo;
pub mod selection_repo;
pub mod video_repo;

pub use content_item_repo::ContentItemRepo;
pub use schedule_repo::ScheduleRepo;
pub use selection_repo::SelectionRepo;
pub use video_repo::VideoRepo;

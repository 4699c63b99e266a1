//! Repository for the `schedules` table.
//!
//! Create and update run the content-item-wide overlap check inside the same
//! transaction as the write, under the content item lock, so two concurrent
//! writers cannot both validate against a stale view and insert overlapping
//! windows.

use sqlx::{PgConnection, PgPool};
use spotlight_core::error::CoreError;
use spotlight_core::schedule::validate_window;
use spotlight_core::types::{DbId, Timestamp};

use crate::error::DbResult;
use crate::models::schedule::{CreateSchedule, Schedule, UpdateSchedule};
use crate::models::video::Video;
use crate::repositories::video_repo::VIDEO_COLUMNS;
use crate::repositories::ContentItemRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const SCHEDULE_COLUMNS: &str = "\
    id, video_id, start_time, end_time, description, created_at, updated_at";

/// CRUD for schedules, with atomic overlap enforcement.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Create a schedule under a video.
    ///
    /// Validates `start_time < end_time` and rejects any window overlapping
    /// an existing one across the whole content item with `Conflict`.
    pub async fn create(
        pool: &PgPool,
        video_id: DbId,
        input: &CreateSchedule,
    ) -> DbResult<Schedule> {
        validate_window(input.start_time, input.end_time)?;

        let mut tx = pool.begin().await?;

        let video_query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&video_query)
            .bind(video_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Video",
                id: video_id,
            })?;

        ContentItemRepo::lock_for_update(&mut tx, video.content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: video.content_item_id,
            })?;

        Self::check_overlap(
            &mut tx,
            video.content_item_id,
            input.start_time,
            input.end_time,
            None,
        )
        .await?;

        let insert_query = format!(
            "INSERT INTO schedules (video_id, start_time, end_time, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let schedule = sqlx::query_as::<_, Schedule>(&insert_query)
            .bind(video_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(schedule)
    }

    /// Update a schedule's window and/or description.
    ///
    /// The merged window is re-validated and re-checked for overlap against
    /// every other schedule of the content item (the row being updated is
    /// excluded from the check).
    pub async fn update(
        pool: &PgPool,
        schedule_id: DbId,
        input: &UpdateSchedule,
    ) -> DbResult<Schedule> {
        let mut tx = pool.begin().await?;

        let find_query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        );
        let existing = sqlx::query_as::<_, Schedule>(&find_query)
            .bind(schedule_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Schedule",
                id: schedule_id,
            })?;

        let video_query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&video_query)
            .bind(existing.video_id)
            .fetch_one(&mut *tx)
            .await?;

        ContentItemRepo::lock_for_update(&mut tx, video.content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: video.content_item_id,
            })?;

        let start_time = input.start_time.unwrap_or(existing.start_time);
        let end_time = input.end_time.unwrap_or(existing.end_time);
        validate_window(start_time, end_time)?;

        Self::check_overlap(
            &mut tx,
            video.content_item_id,
            start_time,
            end_time,
            Some(schedule_id),
        )
        .await?;

        let update_query = format!(
            "UPDATE schedules SET \
                start_time = $2, \
                end_time = $3, \
                description = COALESCE($4, description) \
             WHERE id = $1 \
             RETURNING {SCHEDULE_COLUMNS}"
        );
        let schedule = sqlx::query_as::<_, Schedule>(&update_query)
            .bind(schedule_id)
            .bind(start_time)
            .bind(end_time)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(schedule)
    }

    /// Delete a schedule. No validation; returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a schedule by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Schedule>, sqlx::Error> {
        let query = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1");
        sqlx::query_as::<_, Schedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a video's schedules ordered by start time.
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: DbId,
    ) -> Result<Vec<Schedule>, sqlx::Error> {
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules \
             WHERE video_id = $1 \
             ORDER BY start_time, id"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(video_id)
            .fetch_all(pool)
            .await
    }

    /// List every schedule across a content item's videos, ordered by start
    /// time.
    pub async fn list_by_content_item(
        pool: &PgPool,
        content_item_id: DbId,
    ) -> Result<Vec<Schedule>, sqlx::Error> {
        let query = format!(
            "SELECT s.{} FROM schedules s \
             JOIN videos v ON v.id = s.video_id \
             WHERE v.content_item_id = $1 \
             ORDER BY s.start_time, s.id",
            SCHEDULE_COLUMNS.replace(", ", ", s.")
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(content_item_id)
            .fetch_all(pool)
            .await
    }

    /// Fail with `Conflict` when `[start_time, end_time)` overlaps any
    /// schedule of the content item, excluding `exclude_id` when updating.
    ///
    /// Half-open semantics: touching windows do not conflict.
    async fn check_overlap(
        conn: &mut PgConnection,
        content_item_id: DbId,
        start_time: Timestamp,
        end_time: Timestamp,
        exclude_id: Option<DbId>,
    ) -> DbResult<()> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM schedules s \
             JOIN videos v ON v.id = s.video_id \
             WHERE v.content_item_id = $1 \
               AND s.start_time < $3 AND $2 < s.end_time \
               AND ($4::BIGINT IS NULL OR s.id <> $4)",
        )
        .bind(content_item_id)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;

        if count > 0 {
            return Err(CoreError::Conflict(format!(
                "Schedule window [{start_time}, {end_time}) overlaps an existing schedule \
                 for content item {content_item_id}"
            ))
            .into());
        }
        Ok(())
    }
}

//! Repository for the `videos` table.

use sqlx::PgPool;
use spotlight_core::error::CoreError;
use spotlight_core::types::{DbId, Timestamp};

use crate::error::DbResult;
use crate::models::video::{CreateVideo, Video};
use crate::repositories::ContentItemRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const VIDEO_COLUMNS: &str = "\
    id, content_item_id, order_index, is_pinned, expires_at, created_at, updated_at";

/// CRUD and subscription mutations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Attach a video to a content item, auto-assigning the next
    /// `order_index` unless the input supplies one explicitly.
    ///
    /// Takes the content item lock so concurrent attaches cannot race on the
    /// auto-assigned index.
    pub async fn create(
        pool: &PgPool,
        content_item_id: DbId,
        input: &CreateVideo,
    ) -> DbResult<Video> {
        let mut tx = pool.begin().await?;

        ContentItemRepo::lock_for_update(&mut tx, content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: content_item_id,
            })?;

        let query = format!(
            "INSERT INTO videos (content_item_id, order_index)
             VALUES (
                $1,
                COALESCE($2, (SELECT COALESCE(MAX(order_index), -1) + 1 \
                              FROM videos WHERE content_item_id = $1))
             )
             RETURNING {VIDEO_COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(content_item_id)
            .bind(input.order_index)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(video)
    }

    /// Find a video by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a content item's videos in rotation order.
    pub async fn list_by_content_item(
        pool: &PgPool,
        content_item_id: DbId,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos \
             WHERE content_item_id = $1 \
             ORDER BY order_index, id"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(content_item_id)
            .fetch_all(pool)
            .await
    }

    /// Write a video's subscription expiry.
    ///
    /// When the resulting expiry is not in the future the video is un-pinned
    /// and, if it was the content item's `active_video_id`, that reference is
    /// cleared -- all in the same transaction, so the pin invariant never
    /// points at dead content.
    pub async fn set_subscription(
        pool: &PgPool,
        video_id: DbId,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> DbResult<Video> {
        let mut tx = pool.begin().await?;

        let find_query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let existing = sqlx::query_as::<_, Video>(&find_query)
            .bind(video_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Video",
                id: video_id,
            })?;

        // A video's owning content item never changes, so reading it before
        // taking the lock is safe.
        ContentItemRepo::lock_for_update(&mut tx, existing.content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: existing.content_item_id,
            })?;

        let update_query = format!(
            "UPDATE videos SET expires_at = $2 WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
        );
        let mut video = sqlx::query_as::<_, Video>(&update_query)
            .bind(video_id)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;

        if expires_at <= now {
            if video.is_pinned {
                let unpin_query = format!(
                    "UPDATE videos SET is_pinned = false WHERE id = $1 RETURNING {VIDEO_COLUMNS}"
                );
                video = sqlx::query_as::<_, Video>(&unpin_query)
                    .bind(video_id)
                    .fetch_one(&mut *tx)
                    .await?;
            }
            sqlx::query(
                "UPDATE content_items SET active_video_id = NULL \
                 WHERE id = $1 AND active_video_id = $2",
            )
            .bind(video.content_item_id)
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(video)
    }

    /// Delete a video. Its schedules cascade; if it was pinned, the owning
    /// content item's `active_video_id` is cleared and the rotation cursor
    /// reset, in the same transaction.
    pub async fn delete(pool: &PgPool, video_id: DbId) -> DbResult<()> {
        let mut tx = pool.begin().await?;

        let find_query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&find_query)
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

        sqlx::query(
            "UPDATE content_items SET active_video_id = NULL, rotation_cursor = 0 \
             WHERE id = $1 AND active_video_id = $2",
        )
        .bind(video.content_item_id)
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

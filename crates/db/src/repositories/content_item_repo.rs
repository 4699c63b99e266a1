//! Repository for the `content_items` table.

use sqlx::{PgConnection, PgPool};
use spotlight_core::error::CoreError;
use spotlight_core::rotation::RotationPolicy;
use spotlight_core::types::DbId;

use crate::error::DbResult;
use crate::models::content_item::{ContentItem, CreateContentItem};
use crate::models::video::Video;
use crate::repositories::video_repo::VIDEO_COLUMNS;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "\
    id, title, rotation_policy, active_video_id, rotation_cursor, created_at, updated_at";

/// CRUD and pin/policy mutations for content items.
pub struct ContentItemRepo;

impl ContentItemRepo {
    /// Insert a new content item with default policy and cursor.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContentItem,
    ) -> Result<ContentItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_items (title) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find a content item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_items WHERE id = $1");
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all content items.
    pub async fn list(pool: &PgPool) -> Result<Vec<ContentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_items ORDER BY id");
        sqlx::query_as::<_, ContentItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a content item. Videos and their schedules cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lock a content item row for the duration of the calling transaction.
    ///
    /// Every mutating operation on a content item (and the cursor-advancing
    /// selection read) takes this lock first, serializing them against each
    /// other while operations on other content items proceed in parallel.
    pub(crate) async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Manually pin a video: within one transaction, un-pin every sibling,
    /// pin the target, point `active_video_id` at it, and reset the rotation
    /// cursor.
    ///
    /// Fails with `NotFound` when either id is unknown and
    /// `InvalidOwnership` when the video belongs to a different content item.
    pub async fn set_active(
        pool: &PgPool,
        content_item_id: DbId,
        video_id: DbId,
    ) -> DbResult<ContentItem> {
        let mut tx = pool.begin().await?;

        Self::lock_for_update(&mut tx, content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: content_item_id,
            })?;

        let video_query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&video_query)
            .bind(video_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Video",
                id: video_id,
            })?;

        if video.content_item_id != content_item_id {
            return Err(CoreError::InvalidOwnership {
                entity: "Video",
                id: video_id,
                content_item_id,
            }
            .into());
        }

        sqlx::query(
            "UPDATE videos SET is_pinned = false \
             WHERE content_item_id = $1 AND is_pinned = true AND id <> $2",
        )
        .bind(content_item_id)
        .bind(video_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE videos SET is_pinned = true WHERE id = $1")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;

        let update_query = format!(
            "UPDATE content_items SET active_video_id = $2, rotation_cursor = 0 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ContentItem>(&update_query)
            .bind(content_item_id)
            .bind(video_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Change the rotation policy, unconditionally resetting the cursor --
    /// a policy switch invalidates the prior pointer semantics.
    pub async fn set_rotation_policy(
        pool: &PgPool,
        content_item_id: DbId,
        policy: RotationPolicy,
    ) -> DbResult<ContentItem> {
        let mut tx = pool.begin().await?;

        Self::lock_for_update(&mut tx, content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: content_item_id,
            })?;

        let query = format!(
            "UPDATE content_items SET rotation_policy = $2, rotation_cursor = 0 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ContentItem>(&query)
            .bind(content_item_id)
            .bind(policy.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }
}

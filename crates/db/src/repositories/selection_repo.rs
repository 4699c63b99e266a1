//! The selection orchestrator: answers "which video is live right now".
//!
//! One transaction per call: lock the content item row, snapshot its videos
//! and schedules, run the priority chain from `spotlight_core::selection`,
//! persist the advanced cursor when the rotation path answered, commit.
//! Pin- and schedule-sourced reads leave the cursor untouched.

use sqlx::PgPool;
use spotlight_core::eligibility::remaining_until_expiry;
use spotlight_core::error::CoreError;
use spotlight_core::rotation::RotationPolicy;
use spotlight_core::schedule::ScheduleWindow;
use spotlight_core::selection::{select_active, ItemSnapshot, VideoSnapshot};
use spotlight_core::types::{DbId, Timestamp};

use crate::error::DbResult;
use crate::models::content_item::SelectionResult;
use crate::repositories::ContentItemRepo;

/// Read side of the engine. Stateless except for the documented cursor write.
pub struct SelectionRepo;

impl SelectionRepo {
    /// Resolve the active video for a content item at `now`.
    ///
    /// Fails with `NotFound` for an unknown content item and
    /// `NoEligibleVideo` when nothing playable exists (a normal content
    /// state, mapped to 404 at the API boundary).
    pub async fn get_active_video(
        pool: &PgPool,
        content_item_id: DbId,
        now: Timestamp,
    ) -> DbResult<SelectionResult> {
        let mut tx = pool.begin().await?;

        let item = ContentItemRepo::lock_for_update(&mut tx, content_item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ContentItem",
                id: content_item_id,
            })?;

        let policy = RotationPolicy::parse(&item.rotation_policy).map_err(|_| {
            CoreError::Internal(format!(
                "Content item {content_item_id} has corrupt rotation_policy '{}'",
                item.rotation_policy
            ))
        })?;

        let videos: Vec<(DbId, Option<Timestamp>)> = sqlx::query_as(
            "SELECT id, expires_at FROM videos \
             WHERE content_item_id = $1 \
             ORDER BY order_index, id",
        )
        .bind(content_item_id)
        .fetch_all(&mut *tx)
        .await?;

        let schedules: Vec<(DbId, DbId, Timestamp, Timestamp)> = sqlx::query_as(
            "SELECT s.id, s.video_id, s.start_time, s.end_time \
             FROM schedules s \
             JOIN videos v ON v.id = s.video_id \
             WHERE v.content_item_id = $1",
        )
        .bind(content_item_id)
        .fetch_all(&mut *tx)
        .await?;

        let snapshot = ItemSnapshot {
            id: item.id,
            rotation_policy: policy,
            active_video_id: item.active_video_id,
            rotation_cursor: item.rotation_cursor,
        };
        let video_snapshots: Vec<VideoSnapshot> = videos
            .iter()
            .map(|&(id, expires_at)| VideoSnapshot { id, expires_at })
            .collect();
        let windows: Vec<ScheduleWindow> = schedules
            .iter()
            .map(|&(id, video_id, start_time, end_time)| ScheduleWindow {
                id,
                video_id,
                start_time,
                end_time,
            })
            .collect();

        let outcome = select_active(&snapshot, &video_snapshots, &windows, now);

        if outcome.schedule_contenders > 1 {
            tracing::warn!(
                content_item_id,
                contenders = outcome.schedule_contenders,
                "Multiple schedules active at once; overlap invariant violated, \
                 resolved by latest start_time"
            );
        }

        let selection = outcome.decision.ok_or(CoreError::NoEligibleVideo {
            content_item_id,
        })?;

        if let Some(cursor) = selection.new_cursor {
            if cursor != item.rotation_cursor {
                sqlx::query("UPDATE content_items SET rotation_cursor = $2 WHERE id = $1")
                    .bind(content_item_id)
                    .bind(cursor)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(SelectionResult {
            video_id: selection.video_id,
            source: selection.source,
            schedule_id: selection.schedule_id,
            expires_in_secs: remaining_until_expiry(selection.expires_at, now)
                .map(|remaining| remaining.num_seconds()),
        })
    }
}

//! Integration tests for schedule CRUD and the content-item-wide overlap
//! invariant.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use spotlight_core::error::CoreError;
use spotlight_core::types::{DbId, Timestamp};
use spotlight_db::models::content_item::CreateContentItem;
use spotlight_db::models::schedule::{CreateSchedule, UpdateSchedule};
use spotlight_db::models::video::CreateVideo;
use spotlight_db::repositories::{ContentItemRepo, ScheduleRepo, VideoRepo};
use spotlight_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2030, 3, 1, hour, 0, 0).unwrap()
}

fn window(start: u32, end: u32) -> CreateSchedule {
    CreateSchedule {
        start_time: at(start),
        end_time: at(end),
        description: None,
    }
}

async fn setup_item(pool: &PgPool, title: &str, count: usize) -> (DbId, Vec<DbId>) {
    let item = ContentItemRepo::create(
        pool,
        &CreateContentItem {
            title: title.to_string(),
        },
    )
    .await
    .unwrap();
    let mut video_ids = Vec::with_capacity(count);
    for _ in 0..count {
        let video = VideoRepo::create(pool, item.id, &CreateVideo { order_index: None })
            .await
            .unwrap();
        video_ids.push(video.id);
    }
    (item.id, video_ids)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlap_across_videos_of_same_item_is_rejected(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "overlap", 2).await;

    ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();

    // [11:00, 13:00) on a *different* video of the same item still conflicts.
    let err = ScheduleRepo::create(&pool, videos[1], &window(11, 13))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn touching_windows_are_accepted(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "touching", 2).await;

    ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();
    // Half-open: [12:00, 13:00) starts exactly where the first ends.
    ScheduleRepo::create(&pool, videos[1], &window(12, 13)).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_window_on_other_content_item_is_independent(pool: PgPool) {
    let (_, videos_a) = setup_item(&pool, "item-a", 1).await;
    let (_, videos_b) = setup_item(&pool, "item-b", 1).await;

    ScheduleRepo::create(&pool, videos_a[0], &window(10, 12)).await.unwrap();
    ScheduleRepo::create(&pool, videos_b[0], &window(10, 12)).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_window_is_rejected(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "inverted", 1).await;

    let err = ScheduleRepo::create(&pool, videos[0], &window(12, 10))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_video_is_not_found(pool: PgPool) {
    let err = ScheduleRepo::create(&pool, 9999, &window(10, 12))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "Video",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_excludes_own_window_from_overlap_check(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "self-update", 1).await;

    let schedule = ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();

    // Shrinking within its own previous window must not self-conflict.
    let updated = ScheduleRepo::update(
        &pool,
        schedule.id,
        &UpdateSchedule {
            start_time: Some(at(10)),
            end_time: Some(at(11)),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.end_time, at(11));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_into_sibling_window_is_rejected(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "update-conflict", 2).await;

    ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();
    let second = ScheduleRepo::create(&pool, videos[1], &window(13, 14)).await.unwrap();

    let err = ScheduleRepo::update(
        &pool,
        second.id,
        &UpdateSchedule {
            start_time: Some(at(11)),
            end_time: None,
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Conflict(_)));

    // The failed update left the row untouched.
    let current = ScheduleRepo::find_by_id(&pool, second.id).await.unwrap().unwrap();
    assert_eq!(current.start_time, at(13));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_description_only_keeps_window(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "desc-only", 1).await;
    let schedule = ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();

    let updated = ScheduleRepo::update(
        &pool,
        schedule.id,
        &UpdateSchedule {
            start_time: None,
            end_time: None,
            description: Some("promo".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.start_time, at(10));
    assert_eq!(updated.end_time, at(12));
    assert_eq!(updated.description.as_deref(), Some("promo"));
}

// ---------------------------------------------------------------------------
// Delete and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_frees_the_window(pool: PgPool) {
    let (_, videos) = setup_item(&pool, "delete-frees", 1).await;

    let schedule = ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();
    assert!(ScheduleRepo::delete(&pool, schedule.id).await.unwrap());

    // The window is reusable once its schedule is gone.
    ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_by_content_item_spans_videos_in_start_order(pool: PgPool) {
    let (item_id, videos) = setup_item(&pool, "listing", 2).await;

    ScheduleRepo::create(&pool, videos[1], &window(14, 15)).await.unwrap();
    ScheduleRepo::create(&pool, videos[0], &window(10, 12)).await.unwrap();

    let schedules = ScheduleRepo::list_by_content_item(&pool, item_id).await.unwrap();
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0].start_time, at(10));
    assert_eq!(schedules[1].start_time, at(14));
}

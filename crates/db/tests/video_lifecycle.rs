//! Integration tests for pinning, subscription expiry, and video deletion.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use spotlight_core::error::CoreError;
use spotlight_core::types::DbId;
use spotlight_db::models::content_item::CreateContentItem;
use spotlight_db::models::schedule::CreateSchedule;
use spotlight_db::models::video::CreateVideo;
use spotlight_db::repositories::{ContentItemRepo, ScheduleRepo, VideoRepo};
use spotlight_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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

async fn pinned_ids(pool: &PgPool, item_id: DbId) -> Vec<DbId> {
    VideoRepo::list_by_content_item(pool, item_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|v| v.is_pinned)
        .map(|v| v.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Pinning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_active_pins_exactly_one_video(pool: PgPool) {
    let (item_id, videos) = setup_item(&pool, "single-pin", 3).await;

    // Repeated pins always leave exactly one pinned video.
    for &target in [videos[0], videos[2], videos[1], videos[1]].iter() {
        let item = ContentItemRepo::set_active(&pool, item_id, target).await.unwrap();
        assert_eq!(item.active_video_id, Some(target));
        assert_eq!(item.rotation_cursor, 0);
        assert_eq!(pinned_ids(&pool, item_id).await, vec![target]);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_active_rejects_foreign_video(pool: PgPool) {
    let (item_a, _) = setup_item(&pool, "owner-a", 1).await;
    let (_, videos_b) = setup_item(&pool, "owner-b", 1).await;

    let err = ContentItemRepo::set_active(&pool, item_a, videos_b[0])
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidOwnership { .. }));

    // Nothing was pinned by the failed call.
    assert!(pinned_ids(&pool, item_a).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_active_rejects_unknown_ids(pool: PgPool) {
    let (item_id, videos) = setup_item(&pool, "unknown-ids", 1).await;

    let err = ContentItemRepo::set_active(&pool, item_id, 9999).await.unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "Video",
            ..
        })
    );

    let err = ContentItemRepo::set_active(&pool, 9999, videos[0]).await.unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::NotFound {
            entity: "ContentItem",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Subscription expiry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn future_subscription_keeps_pin(pool: PgPool) {
    let now = Utc::now();
    let (item_id, videos) = setup_item(&pool, "future-sub", 1).await;
    ContentItemRepo::set_active(&pool, item_id, videos[0]).await.unwrap();

    let video = VideoRepo::set_subscription(&pool, videos[0], now + Duration::days(365), now)
        .await
        .unwrap();
    assert!(video.is_pinned);
    // Postgres stores microseconds; compare at second precision.
    assert_eq!(
        video.expires_at.unwrap().timestamp(),
        (now + Duration::days(365)).timestamp()
    );

    let item = ContentItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.active_video_id, Some(videos[0]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_subscription_unpins_and_clears_active_reference(pool: PgPool) {
    let now = Utc::now();
    let (item_id, videos) = setup_item(&pool, "past-sub", 2).await;
    ContentItemRepo::set_active(&pool, item_id, videos[0]).await.unwrap();

    let video = VideoRepo::set_subscription(&pool, videos[0], now - Duration::hours(1), now)
        .await
        .unwrap();
    assert!(!video.is_pinned);

    let item = ContentItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.active_video_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_subscription_on_unpinned_sibling_leaves_pin_alone(pool: PgPool) {
    let now = Utc::now();
    let (item_id, videos) = setup_item(&pool, "sibling-sub", 2).await;
    ContentItemRepo::set_active(&pool, item_id, videos[0]).await.unwrap();

    VideoRepo::set_subscription(&pool, videos[1], now - Duration::hours(1), now)
        .await
        .unwrap();

    let item = ContentItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.active_video_id, Some(videos[0]));
    assert_eq!(pinned_ids(&pool, item_id).await, vec![videos[0]]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn renewed_subscription_restores_eligibility(pool: PgPool) {
    let now = Utc::now();
    let (_, videos) = setup_item(&pool, "renewal", 1).await;

    VideoRepo::set_subscription(&pool, videos[0], now - Duration::hours(1), now)
        .await
        .unwrap();
    let video = VideoRepo::set_subscription(&pool, videos[0], now + Duration::hours(1), now)
        .await
        .unwrap();
    assert_eq!(
        video.expires_at.unwrap().timestamp(),
        (now + Duration::hours(1)).timestamp()
    );
    // Expiry is terminal only until a new subscription moves it forward;
    // the video returns unpinned.
    assert!(!video.is_pinned);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_schedules(pool: PgPool) {
    let now = Utc::now();
    let (item_id, videos) = setup_item(&pool, "cascade", 2).await;

    ScheduleRepo::create(
        &pool,
        videos[0],
        &CreateSchedule {
            start_time: now + Duration::hours(1),
            end_time: now + Duration::hours(2),
            description: None,
        },
    )
    .await
    .unwrap();

    VideoRepo::delete(&pool, videos[0]).await.unwrap();

    let schedules = ScheduleRepo::list_by_content_item(&pool, item_id).await.unwrap();
    assert!(schedules.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_of_pinned_video_clears_item_state(pool: PgPool) {
    let (item_id, videos) = setup_item(&pool, "delete-pinned", 2).await;
    ContentItemRepo::set_active(&pool, item_id, videos[1]).await.unwrap();

    VideoRepo::delete(&pool, videos[1]).await.unwrap();

    let item = ContentItemRepo::find_by_id(&pool, item_id).await.unwrap().unwrap();
    assert_eq!(item.active_video_id, None);
    assert_eq!(item.rotation_cursor, 0);
    assert!(VideoRepo::find_by_id(&pool, videos[1]).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_unknown_video_is_not_found(pool: PgPool) {
    let err = VideoRepo::delete(&pool, 9999).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_index_auto_assigns_in_attach_order(pool: PgPool) {
    let (item_id, _) = setup_item(&pool, "ordering", 3).await;

    let videos = VideoRepo::list_by_content_item(&pool, item_id).await.unwrap();
    let indexes: Vec<i32> = videos.iter().map(|v| v.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
}

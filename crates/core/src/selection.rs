//! The selection priority chain: Schedule -> Manual Pin -> Rotation -> None.
//!
//! [`select_active`] is the single place the "current truth" is derived from
//! a content item's stored state. It never mutates anything itself: when the
//! rotation path is taken it reports the cursor value to persist, and the
//! repository writes it in the same transaction that read the snapshot.

use serde::Serialize;

use crate::eligibility::is_eligible;
use crate::rotation::{advance_cursor, clamp_cursor, RotationPolicy};
use crate::schedule::{resolve_at, ScheduleWindow};
use crate::types::{DbId, Timestamp};

/// The content item fields the chain reads.
#[derive(Debug, Clone, Copy)]
pub struct ItemSnapshot {
    pub id: DbId,
    pub rotation_policy: RotationPolicy,
    pub active_video_id: Option<DbId>,
    pub rotation_cursor: i32,
}

/// One candidate video. Callers pass the item's videos ordered by
/// `order_index` (ascending, ties by id); that ordering is what the rotation
/// cursor indexes into.
#[derive(Debug, Clone, Copy)]
pub struct VideoSnapshot {
    pub id: DbId,
    pub expires_at: Option<Timestamp>,
}

/// Which step of the chain produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Schedule,
    Pinned,
    Rotation,
}

/// The chain's answer for a single selection call.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub video_id: DbId,
    pub source: SelectionSource,
    /// Set when `source` is [`SelectionSource::Schedule`].
    pub schedule_id: Option<DbId>,
    /// The selected video's expiry, for the remaining-duration display field.
    pub expires_at: Option<Timestamp>,
    /// Cursor value to persist, set only when the rotation path was taken
    /// under a `sequential` or `cyclic` policy.
    pub new_cursor: Option<i32>,
}

/// Outcome of running the chain over a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SelectionOutcome {
    /// `None` when nothing eligible exists.
    pub decision: Option<Selection>,
    /// Schedules simultaneously active at `now`. A value above 1 means the
    /// overlap invariant was violated and should be logged.
    pub schedule_contenders: usize,
}

/// Run the priority chain at `now`.
///
/// 1. An active schedule wins if its video is eligible; an expired video
///    cannot be forced live by a schedule.
/// 2. Otherwise an eligible pinned video wins. An ineligible pin is skipped
///    for this call without being cleared -- clearing the pin fields is a
///    subscription-mutation concern.
/// 3. Otherwise rotation over the eligible videos, `none` policy included
///    (it is the trivial rotation that always yields the first video).
pub fn select_active(
    item: &ItemSnapshot,
    videos: &[VideoSnapshot],
    schedules: &[ScheduleWindow],
    now: Timestamp,
) -> SelectionOutcome {
    let mut schedule_contenders = 0;

    // Schedule
    if let Some(resolved) = resolve_at(schedules, now) {
        schedule_contenders = resolved.contenders;
        let video = videos.iter().find(|v| v.id == resolved.video_id);
        if let Some(video) = video {
            if is_eligible(video.expires_at, now) {
                return SelectionOutcome {
                    decision: Some(Selection {
                        video_id: video.id,
                        source: SelectionSource::Schedule,
                        schedule_id: Some(resolved.id),
                        expires_at: video.expires_at,
                        new_cursor: None,
                    }),
                    schedule_contenders,
                };
            }
        }
    }

    // Manual pin
    if let Some(pinned_id) = item.active_video_id {
        let video = videos.iter().find(|v| v.id == pinned_id);
        if let Some(video) = video {
            if is_eligible(video.expires_at, now) {
                return SelectionOutcome {
                    decision: Some(Selection {
                        video_id: video.id,
                        source: SelectionSource::Pinned,
                        schedule_id: None,
                        expires_at: video.expires_at,
                        new_cursor: None,
                    }),
                    schedule_contenders,
                };
            }
        }
    }

    // Rotation
    let eligible: Vec<&VideoSnapshot> = videos
        .iter()
        .filter(|v| is_eligible(v.expires_at, now))
        .collect();

    let Some(index) = clamp_cursor(item.rotation_cursor, eligible.len()) else {
        return SelectionOutcome {
            decision: None,
            schedule_contenders,
        };
    };

    let video = eligible[index];
    let new_cursor = match item.rotation_policy {
        RotationPolicy::None => None,
        policy => Some(advance_cursor(policy, index, eligible.len()) as i32),
    };

    SelectionOutcome {
        decision: Some(Selection {
            video_id: video.id,
            source: SelectionSource::Rotation,
            schedule_id: None,
            expires_at: video.expires_at,
            new_cursor,
        }),
        schedule_contenders,
    }
}

//! Schedule window validation and resolution.
//!
//! A schedule forces one specific video live during a half-open time window
//! `[start_time, end_time)`. Overlap between windows of the same content item
//! is rejected at write time, so at most one window can match a given
//! instant under correct operation; [`resolve_at`] still resolves
//! deterministically when that invariant has been violated.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// The schedule fields the resolver needs, decoupled from the db row type.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleWindow {
    pub id: DbId,
    pub video_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A window that contains `now`.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedWindow {
    pub id: DbId,
    pub video_id: DbId,
    /// How many windows contained `now`. More than one means the overlap
    /// invariant was violated; the caller should log it.
    pub contenders: usize,
}

/// Reject windows that are empty or inverted. Start must be strictly before
/// end; `[t, t)` is an empty window and invalid.
pub fn validate_window(start_time: Timestamp, end_time: Timestamp) -> Result<(), CoreError> {
    if start_time < end_time {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Schedule start_time ({start_time}) must be before end_time ({end_time})"
        )))
    }
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Touching windows (`a_end == b_start`) do not overlap.
pub fn windows_overlap(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Find the window active at `now`, if any.
///
/// When several windows contain `now` (data corruption or a relaxed
/// invariant) the one with the latest `start_time` wins, ties broken by id
/// so the result is stable. This is a defensive tie-break, not a sanctioned
/// state; `contenders` reports how many matched.
pub fn resolve_at(windows: &[ScheduleWindow], now: Timestamp) -> Option<ResolvedWindow> {
    let mut best: Option<&ScheduleWindow> = None;
    let mut contenders = 0;

    for window in windows {
        if window.start_time <= now && now < window.end_time {
            contenders += 1;
            let better = match best {
                None => true,
                Some(current) => (window.start_time, window.id) > (current.start_time, current.id),
            };
            if better {
                best = Some(window);
            }
        }
    }

    best.map(|window| ResolvedWindow {
        id: window.id,
        video_id: window.video_id,
        contenders,
    })
}

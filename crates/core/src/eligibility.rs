//! Video eligibility evaluation.
//!
//! A video is eligible while its subscription has not expired. This module is
//! the sole arbiter of "expired" -- every other component (schedule
//! resolution, pin checks, rotation) filters through [`is_eligible`] rather
//! than comparing timestamps itself.

use chrono::Duration;

use crate::types::Timestamp;

/// Returns `true` if the video is currently usable.
///
/// A video with no `expires_at` never expires. The boundary is inclusive on
/// the expired side: a video whose `expires_at` equals `now` is already
/// ineligible.
pub fn is_eligible(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    match expires_at {
        Some(expiry) => expiry > now,
        None => true,
    }
}

/// Remaining time until expiry, for client display only.
///
/// Returns `None` for videos without an expiry and for already-expired
/// videos (which should not have been selected in the first place).
pub fn remaining_until_expiry(
    expires_at: Option<Timestamp>,
    now: Timestamp,
) -> Option<Duration> {
    expires_at.filter(|expiry| *expiry > now).map(|expiry| expiry - now)
}

//! Subscription expiry inputs.
//!
//! Operators either pick a named preset horizon or supply an explicit
//! timestamp. Presets are calendar offsets from "now" (a year is 12 months,
//! not 365 days), resolved here so the repository only ever sees a concrete
//! `expires_at` value.

use chrono::Months;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Body of a set-subscription call: `{"preset": "1y"}` or
/// `{"until": "2027-01-01T00:00:00Z"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionInput {
    Preset { preset: String },
    Until { until: Timestamp },
}

impl SubscriptionInput {
    /// Resolve to the concrete expiry timestamp to store.
    ///
    /// An explicit `until` in the past is accepted -- writing a past expiry
    /// is how an operator revokes access immediately, and the mutation path
    /// un-pins the video in the same transaction.
    pub fn resolve_expiry(&self, now: Timestamp) -> Result<Timestamp, CoreError> {
        match self {
            SubscriptionInput::Until { until } => Ok(*until),
            SubscriptionInput::Preset { preset } => {
                let months = match preset.as_str() {
                    "1y" => Months::new(12),
                    "2y" => Months::new(24),
                    other => {
                        return Err(CoreError::Validation(format!(
                            "Unknown subscription preset '{other}' (expected 1y or 2y)"
                        )))
                    }
                };
                now.checked_add_months(months).ok_or_else(|| {
                    CoreError::Internal("Subscription expiry out of range".to_string())
                })
            }
        }
    }
}

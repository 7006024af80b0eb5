//! Schedule normalizer
//!
//! Turns the planner's raw text output (expected: a JSON array of activity
//! records) into a canonical `Vec<Activity>`. Pure function - no network or
//! storage I/O, deterministic, idempotent: re-parsing its own serialized
//! output yields an equal sequence.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::activity::Activity;

/// Malformed input to the schedule normalizer.
///
/// Always surfaced to the caller, never swallowed; the message carries the
/// underlying parser diagnostic.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid schedule output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schedule output is not an array")]
    NotAnArray,

    #[error("activity {index}: {source}")]
    Element {
        index: usize,
        source: serde_json::Error,
    },

    #[error("activity {index}: initial datetime {initial} is after final datetime {end}")]
    InvalidSpan {
        index: usize,
        initial: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Parse a raw schedule string into activities.
///
/// Fails with [`FormatError`] when the input is not valid JSON, the top
/// level is not an array, an element carries an activity type outside the
/// closed enumeration, or an element's span is inverted.
pub fn parse_schedule(raw: &str) -> Result<Vec<Activity>, FormatError> {
    debug!(raw_len = raw.len(), "parse_schedule: called");

    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => return Err(FormatError::NotAnArray),
    };

    let mut activities = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let activity: Activity =
            serde_json::from_value(item).map_err(|source| FormatError::Element { index, source })?;

        if activity.initial_datetime > activity.final_datetime {
            return Err(FormatError::InvalidSpan {
                index,
                initial: activity.initial_datetime,
                end: activity.final_datetime,
            });
        }

        activities.push(activity);
    }

    debug!(count = activities.len(), "parse_schedule: parsed");
    Ok(activities)
}

/// Serialize activities back to the wire format.
pub fn serialize_schedule(activities: &[Activity]) -> Result<String, FormatError> {
    debug!(count = activities.len(), "serialize_schedule: called");
    Ok(serde_json::to_string_pretty(activities)?)
}

//! Activity data model
//!
//! An [`Activity`] is the atomic schedulable unit of a travel plan: a typed,
//! time-ranged event with free-text labels and optional purchase metadata.
//! Activities are constructed by the normalizer ([`crate::parse_schedule`])
//! and are read-only afterwards - the layout engine consumes them without
//! mutation, and a new plan state is always a fresh list.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed enumeration of activity types.
///
/// Drives color and merge-row-group selection in the calendar layout.
/// Unrecognized values are rejected at parse time, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Stay,
    Flight,
    Transportation,
    Attraction,
    Meal,
    Other,
}

impl ActivityType {
    /// Display name, identical to the wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stay => "Stay",
            Self::Flight => "Flight",
            Self::Transportation => "Transportation",
            Self::Attraction => "Attraction",
            Self::Meal => "Meal",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One scheduled travel event.
///
/// Wire format uses the planner's camelCase field names so LLM output and
/// stored plans round-trip unchanged. Datetimes are absolute UTC instants;
/// naive inputs are treated as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(with = "datetime")]
    pub initial_datetime: DateTime<Utc>,

    #[serde(with = "datetime")]
    pub final_datetime: DateTime<Utc>,

    /// Free-text location label.
    pub city: String,

    /// Free-text label shown in cells and rows.
    pub activity_name: String,

    pub activity_type: ActivityType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_details: Option<String>,

    /// Open string-to-scalar mapping for type-specific metadata
    /// (e.g. flight number). Keys are not known in advance; consumers
    /// enumerate the union of keys across the rendered set at runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_fields: Option<BTreeMap<String, serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to_buy: Option<String>,

    pub purchased: bool,

    /// Fields the planner emits that the model does not interpret
    /// (e.g. "weekday"). Carried through so re-serialization is lossless.
    #[serde(flatten)]
    pub passthrough: BTreeMap<String, serde_json::Value>,
}

impl Activity {
    /// True when the span starts and ends on the same calendar day.
    ///
    /// Only same-day non-Stay activities are placed into the hourly grid.
    pub fn is_same_day(&self) -> bool {
        self.initial_datetime.date_naive() == self.final_datetime.date_naive()
    }

    /// Start hour slot, 0-23 inclusive.
    pub fn start_hour(&self) -> u32 {
        use chrono::Timelike;
        self.initial_datetime.hour()
    }

    /// End hour slot, 0-23 inclusive.
    pub fn end_hour(&self) -> u32 {
        use chrono::Timelike;
        self.final_datetime.hour()
    }
}

/// Serde codec for the planner's datetime strings.
///
/// Accepts RFC 3339 (`2025-06-01T08:00:00Z`) and timezone-naive ISO 8601
/// (`2025-06-01T08:00:00`, treated as UTC). Serializes as RFC 3339. No
/// timezone inference beyond what the input encodes.
pub mod datetime {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    /// Parse a datetime string the way the planner emits them.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid datetime '{raw}': {e}"))
    }
}

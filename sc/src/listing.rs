//! List-view column support
//!
//! Static column definitions for the flat activity listing plus the
//! runtime enumeration of dynamic `Extra: {key}` columns. Key enumeration
//! is always a reduction over the activity set being rendered - the keys
//! are not known in advance and are never statically enumerated.

use std::collections::BTreeSet;

use crate::activity::Activity;

/// One static column of the activity listing.
#[derive(Debug, Clone, Copy)]
pub struct ListColumn {
    pub header: &'static str,
    pub key: &'static str,
    /// Spreadsheet column width, in character units.
    pub width: u16,
}

/// Static listing columns, in render order.
pub const LIST_COLUMNS: &[ListColumn] = &[
    ListColumn { header: "Initial Datetime", key: "initialDatetime", width: 20 },
    ListColumn { header: "Final Datetime", key: "finalDatetime", width: 20 },
    ListColumn { header: "Weekday", key: "weekday", width: 15 },
    ListColumn { header: "City", key: "city", width: 15 },
    ListColumn { header: "Activity Name", key: "activityName", width: 30 },
    ListColumn { header: "Activity Type", key: "activityType", width: 20 },
    ListColumn { header: "Price", key: "price", width: 10 },
    ListColumn { header: "Provider", key: "providerCompany", width: 20 },
    ListColumn { header: "Extra Details", key: "extraDetails", width: 30 },
    ListColumn { header: "Purchased", key: "purchased", width: 15 },
    ListColumn { header: "Link to Buy", key: "linkToBuy", width: 30 },
];

/// Width used for every dynamic `Extra: {key}` column.
pub const EXTRA_COLUMN_WIDTH: u16 = 20;

/// Union of `extra_fields` keys across the set, lexicographically sorted.
pub fn extra_field_keys(activities: &[Activity]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for activity in activities {
        if let Some(fields) = &activity.extra_fields {
            keys.extend(fields.keys().cloned());
        }
    }
    keys.into_iter().collect()
}

/// Header for a dynamic extra-field column.
pub fn extra_column_header(key: &str) -> String {
    format!("Extra: {key}")
}

/// Value of one extra-field cell; empty string when the activity does not
/// carry the key.
pub fn extra_value(activity: &Activity, key: &str) -> String {
    activity
        .extra_fields
        .as_ref()
        .and_then(|fields| fields.get(key))
        .map(scalar_text)
        .unwrap_or_default()
}

/// Render an open-mapping scalar without JSON quoting.
pub fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Long weekday name of the activity's start, e.g. "Sunday".
pub fn weekday(activity: &Activity) -> String {
    activity.initial_datetime.format("%A").to_string()
}

/// Compact elapsed-time label: whole days when the span reaches a day,
/// whole hours otherwise.
pub fn elapsed_label(activity: &Activity) -> String {
    let minutes = (activity.final_datetime - activity.initial_datetime).num_minutes();
    let days = minutes / (60 * 24);
    if days > 0 {
        format!("{days}d")
    } else {
        format!("{}h", minutes / 60)
    }
}

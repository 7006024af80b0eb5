//! Activity-type color mapping
//!
//! One fixed fill color per activity type, shared by the interactive
//! renderer and the spreadsheet export so both paint identically.

use crate::activity::ActivityType;

/// Neutral fallback fill (white).
pub const DEFAULT_FILL: u32 = 0xFFFFFF;

/// RGB fill color for an activity type.
pub fn fill(activity_type: ActivityType) -> u32 {
    match activity_type {
        ActivityType::Stay => 0xD9E1F2,           // light blue
        ActivityType::Flight => 0xFFC7CE,         // light red
        ActivityType::Transportation => 0xFFFFCC, // light yellow
        ActivityType::Attraction => 0xC6EFCE,     // light green
        ActivityType::Meal => 0xDDEBF7,           // light blue
        ActivityType::Other => 0xE7E6E6,          // light gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_fixed_and_distinct_enough() {
        assert_eq!(fill(ActivityType::Flight), 0xFFC7CE);
        assert_eq!(fill(ActivityType::Stay), 0xD9E1F2);
        assert_eq!(fill(ActivityType::Other), 0xE7E6E6);
        // Deterministic: same input, same output.
        assert_eq!(fill(ActivityType::Meal), fill(ActivityType::Meal));
    }
}

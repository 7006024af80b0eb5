//! Calendar layout engine
//!
//! Computes every placement decision for a plan once, so that the
//! interactive renderer and the spreadsheet export paint identical output
//! from the same [`CalendarLayout`] instead of re-deriving placement
//! independently.
//!
//! Stays occupy stacked header rows above the hourly grid, one merged cell
//! per stay spanning all its days. Everything else lands in a 24-hour by
//! N-day grid, one day column per activity, merged vertically across its
//! hour span.

use tracing::{debug, warn};

use crate::activity::{Activity, ActivityType};
use crate::range::DayRange;

/// Hour slots per day column.
pub const HOURS_PER_DAY: usize = 24;

/// One cell of the hourly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Nothing scheduled in this hour.
    Empty,
    /// First cell of a vertical run: the activity at this index (into the
    /// canonical input sequence) occupies this hour and the `rows - 1`
    /// hours below it in the same day column.
    Start { activity: usize, rows: usize },
    /// Covered by the run started in a [`Cell::Start`] above.
    Covered,
}

/// Placement of one Stay activity in the header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPlacement {
    /// Index into the canonical input sequence.
    pub activity: usize,
    /// Header row this stay was assigned to, 0-based from the top.
    pub row: usize,
    /// First day-column index the stay covers.
    pub start_day: usize,
    /// Last day-column index the stay covers, inclusive.
    pub end_day: usize,
}

impl StayPlacement {
    /// Number of merged day columns.
    pub fn width(&self) -> usize {
        self.end_day - self.start_day + 1
    }
}

/// Complete placement plan for one activity set.
///
/// The input sequence is never reordered or mutated; placements refer back
/// to it by index.
#[derive(Debug, Clone, Default)]
pub struct CalendarLayout {
    days: DayRange,
    stay_rows: usize,
    stays: Vec<StayPlacement>,
    grid: Vec<Vec<Cell>>,
}

impl CalendarLayout {
    /// Compute the layout for a set of activities.
    ///
    /// Zero activities yield an empty layout: empty day range, no stay
    /// rows, no grid columns, no error. Timestamp ordering is the
    /// normalizer's responsibility and is not re-validated here.
    pub fn compute(activities: &[Activity]) -> Self {
        debug!(count = activities.len(), "CalendarLayout::compute: called");

        let days = DayRange::from_activities(activities);
        if days.is_empty() {
            return Self::default();
        }

        let (stay_rows, stays) = place_stays(activities, &days);
        let grid = place_hourly(activities, &days);

        debug!(
            days = days.len(),
            stay_rows,
            stays = stays.len(),
            "CalendarLayout::compute: done"
        );

        Self {
            days,
            stay_rows,
            stays,
            grid,
        }
    }

    pub fn days(&self) -> &DayRange {
        &self.days
    }

    /// Number of stacked Stay header rows (the overlap depth).
    pub fn stay_rows(&self) -> usize {
        self.stay_rows
    }

    pub fn stays(&self) -> &[StayPlacement] {
        &self.stays
    }

    /// Grid cell at a (day index, hour) coordinate.
    pub fn cell(&self, day: usize, hour: usize) -> Cell {
        self.grid
            .get(day)
            .and_then(|column| column.get(hour))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// Header label for a stay cell: `"{city}, {provider or TBD}"`.
    pub fn stay_label(activity: &Activity) -> String {
        format!(
            "{}, {}",
            activity.city,
            activity.provider_company.as_deref().unwrap_or("TBD")
        )
    }
}

/// Assign each Stay to one of `depth` stacked header rows.
///
/// Depth is the maximum number of stays concurrently active on any single
/// day. Assignment is stable: stays sorted by initial datetime ascending,
/// distributed round-robin across rows.
fn place_stays(activities: &[Activity], days: &DayRange) -> (usize, Vec<StayPlacement>) {
    let mut stay_indices: Vec<usize> = activities
        .iter()
        .enumerate()
        .filter(|(_, a)| a.activity_type == ActivityType::Stay)
        .map(|(i, _)| i)
        .collect();
    stay_indices.sort_by_key(|&i| activities[i].initial_datetime);

    if stay_indices.is_empty() {
        return (0, Vec::new());
    }

    // Overlap depth: max stays covering any one day.
    let mut depth = 0usize;
    for (day_index, day) in days.days().iter().enumerate() {
        let active = stay_indices
            .iter()
            .filter(|&&i| {
                let a = &activities[i];
                a.initial_datetime.date_naive() <= *day && a.final_datetime.date_naive() >= *day
            })
            .count();
        if active > depth {
            depth = active;
            debug!(day_index, depth, "place_stays: new overlap depth");
        }
    }

    let mut placements = Vec::with_capacity(stay_indices.len());
    for (position, &index) in stay_indices.iter().enumerate() {
        let activity = &activities[index];
        let start = days.index_of(activity.initial_datetime.date_naive());
        let end = days.index_of(activity.final_datetime.date_naive());
        let (Some(start_day), Some(end_day)) = (start, end) else {
            // Cannot happen for a range derived from the same set; skip
            // rather than panic if a caller hands a foreign range.
            warn!(index, "place_stays: stay outside day range, skipped");
            continue;
        };

        placements.push(StayPlacement {
            activity: index,
            row: position % depth,
            start_day,
            end_day,
        });
    }

    (depth, placements)
}

/// Fill the hourly grid with non-Stay activities.
///
/// Only activities starting and ending on the same calendar day are
/// placed; a cross-midnight non-Stay never enters the grid (it still
/// contributes to the day range and the list export). When two activities
/// claim the same hour cell, the later one in input order wins.
fn place_hourly(activities: &[Activity], days: &DayRange) -> Vec<Vec<Cell>> {
    // Owner map sized once from the day range, indexed [day][hour].
    let mut owner: Vec<[Option<usize>; HOURS_PER_DAY]> = vec![[None; HOURS_PER_DAY]; days.len()];

    for (index, activity) in activities.iter().enumerate() {
        if activity.activity_type == ActivityType::Stay {
            continue;
        }
        if !activity.is_same_day() {
            warn!(
                index,
                name = %activity.activity_name,
                "place_hourly: cross-midnight activity not placed in hourly grid"
            );
            continue;
        }

        let Some(day) = days.index_of(activity.initial_datetime.date_naive()) else {
            warn!(index, "place_hourly: activity outside day range, skipped");
            continue;
        };

        let start = activity.start_hour() as usize;
        let end = activity.end_hour() as usize;
        for hour in start..=end {
            owner[day][hour] = Some(index);
        }
    }

    // Collapse each column's owner runs into Start/Covered cells so
    // renderers can paint merges without looking at the activities again.
    let mut grid = vec![vec![Cell::Empty; HOURS_PER_DAY]; days.len()];
    for (day, column) in owner.iter().enumerate() {
        let mut hour = 0;
        while hour < HOURS_PER_DAY {
            let Some(index) = column[hour] else {
                hour += 1;
                continue;
            };

            let mut rows = 1;
            while hour + rows < HOURS_PER_DAY && column[hour + rows] == Some(index) {
                rows += 1;
            }

            grid[day][hour] = Cell::Start {
                activity: index,
                rows,
            };
            for covered in hour + 1..hour + rows {
                grid[day][covered] = Cell::Covered;
            }
            hour += rows;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_schedule;

    fn activities(raw: serde_json::Value) -> Vec<Activity> {
        parse_schedule(&raw.to_string()).unwrap()
    }

    fn entry(
        name: &str,
        ty: &str,
        start: &str,
        end: &str,
    ) -> serde_json::Value {
        serde_json::json!({
            "initialDatetime": start,
            "finalDatetime": end,
            "city": "Paris",
            "activityName": name,
            "activityType": ty,
            "purchased": false,
        })
    }

    #[test]
    fn test_empty_input_empty_layout() {
        let layout = CalendarLayout::compute(&[]);
        assert!(layout.days().is_empty());
        assert_eq!(layout.stay_rows(), 0);
        assert!(layout.stays().is_empty());
        assert_eq!(layout.cell(0, 0), Cell::Empty);
    }

    #[test]
    fn test_hourly_merge_span() {
        let plan = activities(serde_json::json!([entry(
            "Museum",
            "Attraction",
            "2025-06-01T14:00:00Z",
            "2025-06-01T16:00:00Z"
        )]));
        let layout = CalendarLayout::compute(&plan);

        assert_eq!(layout.cell(0, 14), Cell::Start { activity: 0, rows: 3 });
        assert_eq!(layout.cell(0, 15), Cell::Covered);
        assert_eq!(layout.cell(0, 16), Cell::Covered);
        assert_eq!(layout.cell(0, 13), Cell::Empty);
        assert_eq!(layout.cell(0, 17), Cell::Empty);
    }

    #[test]
    fn test_zero_length_span_single_cell() {
        let plan = activities(serde_json::json!([entry(
            "Checkpoint",
            "Other",
            "2025-06-01T09:00:00Z",
            "2025-06-01T09:00:00Z"
        )]));
        let layout = CalendarLayout::compute(&plan);

        assert_eq!(layout.cell(0, 9), Cell::Start { activity: 0, rows: 1 });
        assert_eq!(layout.cell(0, 10), Cell::Empty);
    }

    #[test]
    fn test_same_day_overlap_last_write_wins() {
        // Both claim hour 10; the later one in input order owns the cell.
        let plan = activities(serde_json::json!([
            entry("First", "Attraction", "2025-06-01T09:00:00Z", "2025-06-01T11:00:00Z"),
            entry("Second", "Meal", "2025-06-01T10:00:00Z", "2025-06-01T12:00:00Z"),
        ]));
        let layout = CalendarLayout::compute(&plan);

        // First keeps its uncontested leading hour.
        assert_eq!(layout.cell(0, 9), Cell::Start { activity: 0, rows: 1 });
        // Second owns 10..=12 as one run.
        assert_eq!(layout.cell(0, 10), Cell::Start { activity: 1, rows: 3 });
        assert_eq!(layout.cell(0, 11), Cell::Covered);
        assert_eq!(layout.cell(0, 12), Cell::Covered);
    }

    #[test]
    fn test_stay_overlap_depth_two_distinct_rows() {
        // Both hotels cover 2025-06-02.
        let plan = activities(serde_json::json!([
            entry("Hotel A", "Stay", "2025-06-01T15:00:00Z", "2025-06-02T11:00:00Z"),
            entry("Hotel B", "Stay", "2025-06-02T14:00:00Z", "2025-06-04T11:00:00Z"),
        ]));
        let layout = CalendarLayout::compute(&plan);

        assert_eq!(layout.stay_rows(), 2);
        assert_eq!(layout.stays().len(), 2);
        assert_ne!(layout.stays()[0].row, layout.stays()[1].row);
    }

    #[test]
    fn test_disjoint_stays_single_row() {
        let plan = activities(serde_json::json!([
            entry("Hotel A", "Stay", "2025-06-01T15:00:00Z", "2025-06-02T11:00:00Z"),
            entry("Hotel B", "Stay", "2025-06-03T14:00:00Z", "2025-06-04T11:00:00Z"),
        ]));
        let layout = CalendarLayout::compute(&plan);

        assert_eq!(layout.stay_rows(), 1);
        assert_eq!(layout.stays()[0].row, 0);
        assert_eq!(layout.stays()[1].row, 0);
    }

    #[test]
    fn test_stay_merge_width() {
        let plan = activities(serde_json::json!([entry(
            "Hotel",
            "Stay",
            "2025-06-01T15:00:00Z",
            "2025-06-04T11:00:00Z"
        )]));
        let layout = CalendarLayout::compute(&plan);

        let stay = layout.stays()[0];
        assert_eq!(stay.start_day, 0);
        assert_eq!(stay.end_day, 3);
        assert_eq!(stay.width(), 4);
    }

    #[test]
    fn test_stay_row_assignment_is_round_robin() {
        // Three stays all covering June 2: depth 3, rows 0, 1, 2 in
        // initial-datetime order regardless of input order.
        let plan = activities(serde_json::json!([
            entry("Hotel C", "Stay", "2025-06-02T12:00:00Z", "2025-06-03T11:00:00Z"),
            entry("Hotel A", "Stay", "2025-06-01T15:00:00Z", "2025-06-02T11:00:00Z"),
            entry("Hotel B", "Stay", "2025-06-02T10:00:00Z", "2025-06-02T23:00:00Z"),
        ]));
        let layout = CalendarLayout::compute(&plan);

        assert_eq!(layout.stay_rows(), 3);
        // Sorted by initial: A (index 1), B (index 2), C (index 0).
        let rows: Vec<(usize, usize)> = layout.stays().iter().map(|s| (s.activity, s.row)).collect();
        assert_eq!(rows, vec![(1, 0), (2, 1), (0, 2)]);
    }

    #[test]
    fn test_cross_midnight_non_stay_dropped_from_grid() {
        let plan = activities(serde_json::json!([entry(
            "Night train",
            "Transportation",
            "2025-06-01T22:00:00Z",
            "2025-06-02T06:00:00Z"
        )]));
        let layout = CalendarLayout::compute(&plan);

        // It widens the day range but never lands in the grid.
        assert_eq!(layout.days().len(), 2);
        for day in 0..2 {
            for hour in 0..HOURS_PER_DAY {
                assert_eq!(layout.cell(day, hour), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_input_order_preserved() {
        let plan = activities(serde_json::json!([
            entry("Hotel B", "Stay", "2025-06-02T14:00:00Z", "2025-06-03T11:00:00Z"),
            entry("Hotel A", "Stay", "2025-06-01T15:00:00Z", "2025-06-02T11:00:00Z"),
        ]));
        let before: Vec<String> = plan.iter().map(|a| a.activity_name.clone()).collect();
        let _ = CalendarLayout::compute(&plan);
        let after: Vec<String> = plan.iter().map(|a| a.activity_name.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_stay_label() {
        let plan = activities(serde_json::json!([
            {
                "initialDatetime": "2025-06-01T15:00:00Z",
                "finalDatetime": "2025-06-02T11:00:00Z",
                "city": "Paris",
                "activityName": "Hotel",
                "activityType": "Stay",
                "providerCompany": "Hotel Parisian",
                "purchased": true,
            },
            entry("Hostel", "Stay", "2025-06-03T15:00:00Z", "2025-06-04T11:00:00Z"),
        ]));

        assert_eq!(CalendarLayout::stay_label(&plan[0]), "Paris, Hotel Parisian");
        assert_eq!(CalendarLayout::stay_label(&plan[1]), "Paris, TBD");
    }
}

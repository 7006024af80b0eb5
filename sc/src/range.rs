//! Day-range utilities
//!
//! A [`DayRange`] is the inclusive sequence of calendar days covering every
//! activity in a plan, derived from the earliest and latest timestamps and
//! never stored. Day boundaries are [00:00:00.000, 23:59:59.999] UTC.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::activity::Activity;

/// Inclusive, ordered sequence of calendar days covering a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRange {
    days: Vec<NaiveDate>,
}

impl DayRange {
    /// Compute the covering day range for a set of activities.
    ///
    /// Empty input yields an empty range rather than an error.
    pub fn from_activities(activities: &[Activity]) -> Self {
        debug!(count = activities.len(), "DayRange::from_activities: called");

        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for activity in activities {
            for date in [
                activity.initial_datetime.date_naive(),
                activity.final_datetime.date_naive(),
            ] {
                bounds = Some(match bounds {
                    None => (date, date),
                    Some((min, max)) => (min.min(date), max.max(date)),
                });
            }
        }

        let Some((min, max)) = bounds else {
            return Self::default();
        };

        let mut days = Vec::new();
        let mut day = min;
        while day <= max {
            days.push(day);
            day = day.succ_opt().expect("calendar day out of chrono range");
        }

        debug!(days = days.len(), "DayRange::from_activities: computed");
        Self { days }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Index of a calendar day within the range, if covered.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.first().and_then(|first| {
            let offset = (date - *first).num_days();
            if offset < 0 || offset as usize >= self.days.len() {
                None
            } else {
                Some(offset as usize)
            }
        })
    }

    /// Column header label for a day, e.g. "Sun, Jun 1".
    pub fn label(date: NaiveDate) -> String {
        format!(
            "{}, {} {}",
            date.format("%a"),
            date.format("%b"),
            date.day()
        )
    }
}

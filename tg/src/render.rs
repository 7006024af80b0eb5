//! Terminal rendering of plans
//!
//! Paints the list and calendar views from data the core already computed.
//! The calendar renderer never re-derives placement; it reads cells off the
//! [`CalendarLayout`] grid, so the terminal view and the Excel export stay
//! structurally identical.

use colored::{Color, Colorize};

use schedcore::{Activity, ActivityType, CalendarLayout, Cell, DayRange, HOURS_PER_DAY, listing};

/// Continuation marker for multi-hour runs in the calendar grid.
const COVERED_MARK: &str = "|";

/// Terminal accent color per activity type.
pub fn type_color(activity_type: ActivityType) -> Color {
    match activity_type {
        ActivityType::Stay => Color::Magenta,
        ActivityType::Flight => Color::Red,
        ActivityType::Transportation => Color::Yellow,
        ActivityType::Attraction => Color::Green,
        ActivityType::Meal => Color::Blue,
        ActivityType::Other => Color::White,
    }
}

/// Render the flat list view.
///
/// Columns mirror the Excel listing sheet, plus a terminal-only Duration
/// column and the dynamic `Extra: {key}` columns for this activity set.
pub fn render_list(activities: &[Activity], color: bool) -> String {
    if activities.is_empty() {
        return "No activities in the current plan.\n".to_string();
    }

    let extra_keys = listing::extra_field_keys(activities);

    let mut headers: Vec<String> = listing::LIST_COLUMNS.iter().map(|c| c.header.to_string()).collect();
    headers.push("Duration".to_string());
    headers.extend(extra_keys.iter().map(|key| listing::extra_column_header(key)));

    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|activity| {
            let mut cells: Vec<String> = listing::LIST_COLUMNS
                .iter()
                .map(|column| list_cell_text(activity, column.key))
                .collect();
            cells.push(listing::elapsed_label(activity));
            cells.extend(extra_keys.iter().map(|key| listing::extra_value(activity, key)));
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    let type_col = listing::LIST_COLUMNS
        .iter()
        .position(|c| c.key == "activityType")
        .unwrap_or(0);

    let mut out = String::new();
    push_row(&mut out, &headers, &widths, |cell, _| {
        if color { cell.bold().to_string() } else { cell.to_string() }
    });
    for (row, activity) in rows.iter().zip(activities) {
        push_row(&mut out, row, &widths, |cell, col| {
            if color && col == type_col {
                cell.color(type_color(activity.activity_type)).to_string()
            } else {
                cell.to_string()
            }
        });
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize], paint: impl Fn(&str, usize) -> String) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(col, (cell, width))| paint(&pad(cell, width), col))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Text for one static list cell, in listing-sheet semantics.
fn list_cell_text(activity: &Activity, key: &str) -> String {
    match key {
        "initialDatetime" => activity.initial_datetime.format("%Y-%m-%d %H:%M").to_string(),
        "finalDatetime" => activity.final_datetime.format("%Y-%m-%d %H:%M").to_string(),
        "weekday" => listing::weekday(activity),
        "city" => activity.city.clone(),
        "activityName" => activity.activity_name.clone(),
        "activityType" => activity.activity_type.to_string(),
        "price" => activity.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
        "providerCompany" => activity.provider_company.clone().unwrap_or_default(),
        "extraDetails" => activity.extra_details.clone().unwrap_or_default(),
        "purchased" => if activity.purchased { "Yes" } else { "No" }.to_string(),
        "linkToBuy" => activity.link_to_buy.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Width of one day column in the calendar view.
const DAY_COLUMN_WIDTH: usize = 20;

/// Width of the leading time/label column.
const TIME_COLUMN_WIDTH: usize = 6;

/// Render the hourly calendar view from the computed layout.
pub fn render_calendar(activities: &[Activity], color: bool) -> String {
    let layout = CalendarLayout::compute(activities);
    if layout.days().is_empty() {
        return "No activities in the current plan.\n".to_string();
    }

    let mut out = String::new();
    let day_count = layout.days().len();

    // Header: day labels
    let mut line = vec![pad("Time", TIME_COLUMN_WIDTH)];
    for date in layout.days().days() {
        let label = pad(&DayRange::label(*date), DAY_COLUMN_WIDTH);
        line.push(if color { label.bold().to_string() } else { label });
    }
    push_line(&mut out, line);

    // Stay header rows, one per overlap depth level
    let stay_color = type_color(ActivityType::Stay);
    for row in 0..layout.stay_rows() {
        let mut cells = vec![String::new(); day_count];
        for stay in layout.stays().iter().filter(|stay| stay.row == row) {
            let label = CalendarLayout::stay_label(&activities[stay.activity]);
            cells[stay.start_day] = fit(&label, DAY_COLUMN_WIDTH);
            for day in stay.start_day + 1..=stay.end_day {
                cells[day] = COVERED_MARK.to_string();
            }
        }

        let mut line = vec![pad(if row == 0 { "Stays" } else { "" }, TIME_COLUMN_WIDTH)];
        for cell in cells {
            let padded = pad(&cell, DAY_COLUMN_WIDTH);
            line.push(if color && !cell.is_empty() {
                padded.color(stay_color).to_string()
            } else {
                padded
            });
        }
        push_line(&mut out, line);
    }

    // Hour rows: paint Start cells, mark covered hours
    for hour in 0..HOURS_PER_DAY {
        let mut line = vec![pad(&format!("{hour:02}:00"), TIME_COLUMN_WIDTH)];
        for day in 0..day_count {
            let (text, cell_type) = match layout.cell(day, hour) {
                Cell::Empty => (String::new(), None),
                Cell::Start { activity, .. } => (
                    fit(&activities[activity].activity_name, DAY_COLUMN_WIDTH),
                    Some(activities[activity].activity_type),
                ),
                Cell::Covered => (COVERED_MARK.to_string(), None),
            };
            let padded = pad(&text, DAY_COLUMN_WIDTH);
            line.push(match cell_type {
                Some(activity_type) if color => padded.color(type_color(activity_type)).to_string(),
                _ => padded,
            });
        }
        push_line(&mut out, line);
    }

    out
}

fn push_line(out: &mut String, cells: Vec<String>) {
    out.push_str(cells.join(" ").trim_end());
    out.push('\n');
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Truncate to the column width, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let truncated: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{truncated}...")
}

//! Excel export
//!
//! Writes one workbook with two sheets: a flat "Activities List" (static
//! columns plus dynamic `Extra: {key}` columns) and a "Travel Calendar"
//! reproducing the interactive grid - Time column, one column per day,
//! stay header rows above 24 hour rows, merged and colored cells. All
//! placement decisions come from [`CalendarLayout`]; this module only
//! paints them.

use std::path::Path;

use chrono::SecondsFormat;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::debug;

use crate::activity::Activity;
use crate::color;
use crate::layout::{CalendarLayout, Cell, HOURS_PER_DAY};
use crate::listing;
use crate::range::DayRange;

/// Download filename convention for exported schedules.
pub const EXPORT_FILENAME: &str = "travel_schedule.xlsx";

/// MIME type of the exported workbook.
pub const EXPORT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Failure while producing the spreadsheet.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Exports travel activities to a two-sheet workbook.
pub struct ExcelExporter;

impl ExcelExporter {
    /// Build the workbook in memory.
    pub fn build(activities: &[Activity]) -> Result<Workbook, ExportError> {
        debug!(count = activities.len(), "ExcelExporter::build: called");

        let mut workbook = Workbook::new();
        write_list_sheet(workbook.add_worksheet(), activities)?;
        write_calendar_sheet(workbook.add_worksheet(), activities)?;
        Ok(workbook)
    }

    /// Export to an in-memory xlsx buffer.
    pub fn to_buffer(activities: &[Activity]) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Self::build(activities)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Export to a file on disk.
    pub fn to_file(activities: &[Activity], path: &Path) -> Result<(), ExportError> {
        debug!(path = %path.display(), "ExcelExporter::to_file: called");
        let mut workbook = Self::build(activities)?;
        workbook.save(path)?;
        Ok(())
    }
}

fn write_list_sheet(sheet: &mut Worksheet, activities: &[Activity]) -> Result<(), ExportError> {
    sheet.set_name("Activities List")?;

    let header_format = Format::new().set_bold();
    let extra_keys = listing::extra_field_keys(activities);

    for (col, column) in listing::LIST_COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, column.header, &header_format)?;
        sheet.set_column_width(col, column.width as f64)?;
    }
    for (offset, key) in extra_keys.iter().enumerate() {
        let col = (listing::LIST_COLUMNS.len() + offset) as u16;
        sheet.write_string_with_format(0, col, &listing::extra_column_header(key), &header_format)?;
        sheet.set_column_width(col, listing::EXTRA_COLUMN_WIDTH as f64)?;
    }

    for (index, activity) in activities.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, column) in listing::LIST_COLUMNS.iter().enumerate() {
            let col = col as u16;
            match column.key {
                "price" => {
                    if let Some(price) = activity.price {
                        sheet.write_number(row, col, price)?;
                    }
                }
                key => {
                    let text = list_cell_text(activity, key);
                    if !text.is_empty() {
                        sheet.write_string(row, col, &text)?;
                    }
                }
            }
        }
        for (offset, key) in extra_keys.iter().enumerate() {
            let col = (listing::LIST_COLUMNS.len() + offset) as u16;
            let text = listing::extra_value(activity, key);
            if !text.is_empty() {
                sheet.write_string(row, col, &text)?;
            }
        }
    }

    Ok(())
}

/// Text for one static list cell. Price is written as a number elsewhere.
fn list_cell_text(activity: &Activity, key: &str) -> String {
    match key {
        "initialDatetime" => activity
            .initial_datetime
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        "finalDatetime" => activity
            .final_datetime
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        "weekday" => listing::weekday(activity),
        "city" => activity.city.clone(),
        "activityName" => activity.activity_name.clone(),
        "activityType" => activity.activity_type.to_string(),
        "providerCompany" => activity.provider_company.clone().unwrap_or_default(),
        "extraDetails" => activity.extra_details.clone().unwrap_or_default(),
        "purchased" => if activity.purchased { "Yes" } else { "No" }.to_string(),
        "linkToBuy" => activity.link_to_buy.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

fn write_calendar_sheet(sheet: &mut Worksheet, activities: &[Activity]) -> Result<(), ExportError> {
    sheet.set_name("Travel Calendar")?;

    let layout = CalendarLayout::compute(activities);

    sheet.write_string(0, 0, "Time")?;
    sheet.set_column_width(0, 10.0)?;
    for (day, date) in layout.days().days().iter().enumerate() {
        let col = (day + 1) as u16;
        sheet.write_string(0, col, &DayRange::label(*date))?;
        sheet.set_column_width(col, 20.0)?;
    }

    let depth = layout.stay_rows() as u32;

    // Stay header rows sit between the day headers and the hourly grid.
    if depth > 0 {
        if depth > 1 {
            sheet.merge_range(1, 0, depth, 0, "Stays", &Format::new().set_bold())?;
        } else {
            sheet.write_string_with_format(1, 0, "Stays", &Format::new().set_bold())?;
        }
    }

    let stay_format = cell_format(color::fill(crate::activity::ActivityType::Stay));
    for stay in layout.stays() {
        let row = 1 + stay.row as u32;
        let first_col = (stay.start_day + 1) as u16;
        let last_col = (stay.end_day + 1) as u16;
        let label = CalendarLayout::stay_label(&activities[stay.activity]);
        if last_col > first_col {
            sheet.merge_range(row, first_col, row, last_col, &label, &stay_format)?;
        } else {
            sheet.write_string_with_format(row, first_col, &label, &stay_format)?;
        }
    }

    for hour in 0..HOURS_PER_DAY {
        let row = depth + 1 + hour as u32;
        sheet.write_string(row, 0, &format!("{hour:02}:00"))?;
    }

    for day in 0..layout.days().len() {
        let col = (day + 1) as u16;
        for hour in 0..HOURS_PER_DAY {
            let Cell::Start { activity, rows } = layout.cell(day, hour) else {
                continue;
            };
            let activity = &activities[activity];
            let format = cell_format(color::fill(activity.activity_type));
            let first_row = depth + 1 + hour as u32;
            let last_row = first_row + (rows - 1) as u32;
            if last_row > first_row {
                sheet.merge_range(first_row, col, last_row, col, &activity.activity_name, &format)?;
            } else {
                sheet.write_string_with_format(first_row, col, &activity.activity_name, &format)?;
            }
        }
    }

    Ok(())
}

fn cell_format(rgb: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(rgb))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_schedule;

    #[test]
    fn test_export_produces_xlsx_buffer() {
        let buffer = ExcelExporter::to_buffer(&sample_schedule()).unwrap();
        // xlsx is a zip container; check the magic instead of the size.
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_export_empty_plan_still_builds() {
        let buffer = ExcelExporter::to_buffer(&[]).unwrap();
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILENAME);
        ExcelExporter::to_file(&sample_schedule(), &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_filename_and_mime_conventions() {
        assert_eq!(EXPORT_FILENAME, "travel_schedule.xlsx");
        assert!(EXPORT_MIME.ends_with("spreadsheetml.sheet"));
    }
}

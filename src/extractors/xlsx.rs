use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use std::path::Path;

use super::TextUnit;
use crate::error::ExtractError;
use crate::models::Section;

/// Extract non-empty cells from an XLSX or XLS workbook
///
/// Sheets are visited in workbook order, cells row by row. The unit number is
/// a single running counter across the whole workbook, it does not restart
/// on each sheet.
pub fn extract_spreadsheet(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let mut workbook = open_workbook_auto(path)?;
    let mut units = Vec::new();
    let mut cell_index = 0;

    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        for row in range.rows() {
            for cell in row {
                let Some(text) = cell_text(cell) else {
                    continue;
                };
                cell_index += 1;
                units.push(
                    TextUnit::new(cell_index, text).in_section(Section::Sheet {
                        name: sheet_name.clone(),
                    }),
                );
            }
        }
    }

    Ok(units)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::DateTime(dt) if dt.is_datetime() => Some(format_datetime(dt)),
        other => Some(other.to_string()),
    }
}

/// Date cells read as the calendar date, with the time only when it is set
fn format_datetime(dt: &ExcelDateTime) -> String {
    let (year, month, day, hour, minute, second, _) = dt.to_ymd_hms_milli();
    if (hour, minute, second) == (0, 0, 0) {
        format!("{:04}-{:02}-{:02}", year, month, day)
    } else {
        format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", year, month, day, hour, minute, second)
    }
}

//! CSV exchange: importing roster records and exporting attendance sheets.

use crate::error::Result;
use crate::models::AttendanceEntry;
use csv::{ReaderBuilder, Writer};
use std::path::Path;

/// Reads the records of a roster CSV file (student name, roll number).
///
/// Records are returned as raw fields; their shape is checked when they are inserted with
/// [`bulk_insert_from_records`](crate::manager::AttendanceManager::bulk_insert_from_records).
pub fn read_records(path: impl AsRef<Path>, has_header: bool) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }

    Ok(records)
}

/// Writes an attendance sheet as `Roll_no,Student_name,Attendance` lines.
pub fn write_sheet(path: impl AsRef<Path>, entries: &[AttendanceEntry]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    writer.write_record(["Roll_no", "Student_name", "Attendance"])?;
    for entry in entries {
        writer.write_record([
            entry.roll_no.to_string().as_str(),
            entry.name.as_str(),
            entry.status.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

use crate::schema::class_passwords;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Nullable, Text};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// A student on a class roster.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Tabled)]
pub struct Student {
    #[diesel(sql_type = Integer)]
    #[tabled(rename = "Roll no")]
    pub roll_no: i32,
    #[diesel(sql_type = Text)]
    #[tabled(rename = "Name")]
    pub name: String,
}

/// Whether a student attended on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Present,
    #[default]
    Absent,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
        }
    }

    /// Reads a raw attendance cell. Anything other than "present" counts as absent, including a
    /// NULL cell.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            Some(value) if value.trim().eq_ignore_ascii_case("present") => Status::Present,
            _ => Status::Absent,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Status::Present),
            "absent" | "a" => Ok(Status::Absent),
            other => Err(format!("unknown attendance status {other:?}")),
        }
    }
}

/// One line of an attendance sheet: a student and their status on that day.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct AttendanceEntry {
    #[tabled(rename = "Roll no")]
    pub roll_no: i32,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Attendance")]
    pub status: Status,
}

/// A sheet row as it comes out of the database, before the cell is interpreted.
#[derive(QueryableByName)]
pub(crate) struct AttendanceRow {
    #[diesel(sql_type = Integer)]
    pub roll_no: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub status: Option<String>,
}

impl From<AttendanceRow> for AttendanceEntry {
    fn from(row: AttendanceRow) -> Self {
        Self {
            roll_no: row.roll_no,
            name: row.name,
            status: Status::from_cell(row.status.as_deref()),
        }
    }
}

/// An edit to one student's line on an attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceUpdate {
    pub roll_no: i32,
    pub status: Status,
    /// Renames the student when set to a non-blank name.
    pub name: Option<String>,
}

impl AttendanceUpdate {
    pub fn status(roll_no: i32, status: Status) -> Self {
        Self {
            roll_no,
            status,
            name: None,
        }
    }
}

/// A single name from a catalog query (tables or columns).
#[derive(QueryableByName)]
pub(crate) struct NameRow {
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = class_passwords)]
pub(crate) struct NewClassPassword<'a> {
    pub class_name: &'a str,
    pub password_hash: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cells() {
        assert_eq!(Status::from_cell(Some("Present")), Status::Present);
        assert_eq!(Status::from_cell(Some("present ")), Status::Present);
        assert_eq!(Status::from_cell(Some("Absent")), Status::Absent);
        assert_eq!(Status::from_cell(Some("late")), Status::Absent);
        assert_eq!(Status::from_cell(None), Status::Absent);
    }

    #[test]
    fn status_parsing() {
        assert_eq!("P".parse::<Status>(), Ok(Status::Present));
        assert_eq!("absent".parse::<Status>(), Ok(Status::Absent));
        assert!("excused".parse::<Status>().is_err());
        assert_eq!(Status::Present.to_string(), "Present");
    }
}

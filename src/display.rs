use crate::models::{AttendanceEntry, Status, Student};
use chrono::NaiveDate;
use tabled::{Table, settings::Style};

/// Renders a class roster.
pub fn roster_table(class: &str, students: &[Student]) -> String {
    let mut table = Table::new(students);
    table.with(Style::modern());

    format!("{class} roster ({} students):\n{table}", students.len())
}

/// Renders the attendance of a class for one day, with a present count.
pub fn sheet_table(class: &str, date: NaiveDate, entries: &[AttendanceEntry]) -> String {
    let present = entries
        .iter()
        .filter(|entry| entry.status == Status::Present)
        .count();

    let mut table = Table::new(entries);
    table.with(Style::modern());

    format!(
        "{class} attendance on {date} ({present}/{} present):\n{table}",
        entries.len()
    )
}

/// Renders a plain list of class names.
pub fn class_list(classes: &[String]) -> String {
    if classes.is_empty() {
        return "No classes yet, create one with create-class.".to_string();
    }

    let mut out = String::from("Classes:");
    for class in classes {
        out.push_str("\n  ");
        out.push_str(class);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_counts_present_students() {
        let entries = vec![
            AttendanceEntry {
                roll_no: 1,
                name: "Alice".to_string(),
                status: Status::Present,
            },
            AttendanceEntry {
                roll_no: 2,
                name: "Bob".to_string(),
                status: Status::Absent,
            },
        ];

        let rendered = sheet_table("CS101", NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(), &entries);
        assert!(rendered.starts_with("CS101 attendance on 2025-03-07 (1/2 present):"));
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("Absent"));
    }

    #[test]
    fn empty_class_list() {
        assert_eq!(class_list(&[]), "No classes yet, create one with create-class.");
        assert_eq!(
            class_list(&["A".to_string(), "B".to_string()]),
            "Classes:\n  A\n  B"
        );
    }
}

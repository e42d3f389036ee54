//! SQL text that differs between the embedded and the client-server engine.
//!
//! Every identifier handed to these functions must already have passed the identifier grammar
//! (class names) or been produced from a date (date columns); quoting here is not escaping.

use super::Statement;
use crate::ident::PASSWORD_TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Mysql,
}

impl Dialect {
    pub fn quote(self, identifier: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{identifier}\""),
            Dialect::Mysql => format!("`{identifier}`"),
        }
    }

    /// Whether `a` and `b` name the same table. The embedded engine folds ASCII case in table
    /// names; the client-server engine is treated as case-sensitive.
    pub fn same_table(self, a: &str, b: &str) -> bool {
        match self {
            Dialect::Sqlite => a.eq_ignore_ascii_case(b),
            Dialect::Mysql => a == b,
        }
    }

    pub fn create_class_table(self, table: &str) -> Statement {
        let sql = match self {
            Dialect::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                 Student_id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 Student_name TEXT NOT NULL, \
                 Roll_no INTEGER NOT NULL UNIQUE)",
                self.quote(table)
            ),
            Dialect::Mysql => format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                 Student_id INT AUTO_INCREMENT PRIMARY KEY, \
                 Student_name VARCHAR(255) NOT NULL, \
                 Roll_no INT NOT NULL UNIQUE) ENGINE=InnoDB",
                self.quote(table)
            ),
        };
        Statement::new(sql)
    }

    pub fn create_password_table(self) -> Statement {
        Statement::new(format!(
            "CREATE TABLE IF NOT EXISTS {PASSWORD_TABLE} (\
             class_name VARCHAR(255) PRIMARY KEY, \
             password_hash VARCHAR(255) NOT NULL)"
        ))
    }

    /// Lists user tables as `name`, including the password table.
    pub fn list_tables(self) -> Statement {
        match self {
            Dialect::Sqlite => Statement::new(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_' \
                 ORDER BY name",
            ),
            Dialect::Mysql => Statement::new(
                "SELECT table_name AS name FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
                 ORDER BY table_name",
            ),
        }
    }

    /// Lists the columns of `table` as `name`.
    pub fn list_columns(self, table: &str) -> Statement {
        match self {
            Dialect::Sqlite => {
                Statement::new("SELECT name FROM pragma_table_info(?)").text(table)
            }
            Dialect::Mysql => Statement::new(
                "SELECT column_name AS name FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ?",
            )
            .text(table),
        }
    }

    pub fn add_date_column(self, table: &str, column: &str) -> Statement {
        Statement::new(format!(
            "ALTER TABLE {} ADD COLUMN {} VARCHAR(20) DEFAULT 'Absent'",
            self.quote(table),
            self.quote(column)
        ))
    }

    /// An insert of `rows` `(Student_name, Roll_no)` pairs that renames on a duplicate roll.
    pub fn upsert_students(self, table: &str, rows: usize) -> String {
        let values = vec!["(?, ?)"; rows].join(", ");
        let conflict = match self {
            Dialect::Sqlite => "ON CONFLICT(Roll_no) DO UPDATE SET Student_name = excluded.Student_name",
            Dialect::Mysql => "ON DUPLICATE KEY UPDATE Student_name = VALUES(Student_name)",
        };
        format!(
            "INSERT INTO {} (Student_name, Roll_no) VALUES {values} {conflict}",
            self.quote(table)
        )
    }
}

/// `?, ?, ?` for an `IN (...)` list of `count` values.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

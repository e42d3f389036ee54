//! The identifier grammar for table names.
//!
//! Table names have to be spliced into SQL text (placeholders only work for values), so every
//! name that reaches a statement goes through [`validate_identifier`] first.

use crate::error::{AttendanceError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// The table holding the per-class password hashes. Never a class.
pub const PASSWORD_TABLE: &str = "class_passwords";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("identifier regex is valid"));

/// Fails with [`AttendanceError::InvalidIdentifier`] unless `name` is a letter followed by
/// letters, digits, underscores, or hyphens.
pub fn validate_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(AttendanceError::InvalidIdentifier(name.to_string()))
    }
}

/// Like [`validate_identifier`], but also refuses the reserved password table.
pub fn validate_class_name(name: &str) -> Result<()> {
    validate_identifier(name)?;

    if name.eq_ignore_ascii_case(PASSWORD_TABLE) {
        return Err(AttendanceError::InvalidIdentifier(name.to_string()));
    }

    Ok(())
}

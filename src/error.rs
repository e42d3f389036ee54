use thiserror::Error;

/// Everything that can go wrong while talking to the attendance store.
///
/// The front-end shows these to the user as-is, so the messages are written for a person rather
/// than a log file.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Invalid identifier {0:?}: must start with a letter and contain only letters, digits, '_' or '-'")]
    InvalidIdentifier(String),

    #[error("Error connecting to the database: {0}")]
    ConnectionFailure(String),

    #[error("Class {0:?} not found")]
    ClassNotFound(String),

    #[error("No password set for class {0:?}, please set one")]
    NoPasswordSet(String),

    #[error("Authentication failed: incorrect password")]
    AuthenticationFailed,

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Failed to add column {column} to {table}: {source}")]
    SchemaMigrationFailure {
        table: String,
        column: String,
        #[source]
        source: diesel::result::Error,
    },

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for attendance store operations.
pub type Result<T> = std::result::Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_display() {
        let error = AttendanceError::InvalidIdentifier("1st year".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid identifier \"1st year\": must start with a letter and contain only letters, digits, '_' or '-'"
        );
    }

    #[test]
    fn test_class_not_found_display() {
        let error = AttendanceError::ClassNotFound("CS101".to_string());
        assert_eq!(error.to_string(), "Class \"CS101\" not found");
    }

    #[test]
    fn test_no_password_set_display() {
        let error = AttendanceError::NoPasswordSet("CS101".to_string());
        assert_eq!(
            error.to_string(),
            "No password set for class \"CS101\", please set one"
        );
    }

    #[test]
    fn test_schema_migration_failure_display() {
        let error = AttendanceError::SchemaMigrationFailure {
            table: "CS101".to_string(),
            column: "2025_03_03".to_string(),
            source: diesel::result::Error::NotFound,
        };
        assert_eq!(
            error.to_string(),
            "Failed to add column 2025_03_03 to CS101: Record not found"
        );
    }
}

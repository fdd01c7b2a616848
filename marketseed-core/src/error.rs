/// Structured error types for marketseed-core.
///
/// The core crate never links a database driver, so driver errors arrive
/// boxed through [`SeedError::Database`]. The CLI wraps everything in
/// `anyhow` for reporting.
use thiserror::Error;

use crate::table::Table;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for seeding operations
#[derive(Error, Debug)]
pub enum SeedError {
    /// Required environment variable is not set
    #[error("{var} not set")]
    MissingConfig { var: &'static str },

    /// Configuration file or value is invalid
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Statement execution failed in the database
    #[error("Database error while {context}: {source}")]
    Database {
        context: String,
        #[source]
        source: BoxedSource,
    },

    /// INSERT ... RETURNING yielded a different number of ids than rows sent
    #[error("{table}: submitted {expected} rows but {returned} ids came back")]
    ReturnedIdMismatch {
        table: Table,
        expected: usize,
        returned: usize,
    },

    /// Row width does not match the table's column list
    #[error("{table}: expected {expected} values per row, found {found}")]
    ColumnMismatch {
        table: Table,
        expected: usize,
        found: usize,
    },

    /// JSON payload serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for seeding operations
pub type Result<T> = std::result::Result<T, SeedError>;

impl SeedError {
    /// Wrap a driver error with a short description of what was running
    pub fn database<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeedError::MissingConfig {
            var: "DATABASE_URL",
        };
        assert_eq!(err.to_string(), "DATABASE_URL not set");

        let err = SeedError::ReturnedIdMismatch {
            table: Table::Jobs,
            expected: 100,
            returned: 99,
        };
        assert_eq!(err.to_string(), "jobs: submitted 100 rows but 99 ids came back");
    }

    #[test]
    fn test_database_error_keeps_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = SeedError::database("inserting users", io_err);

        assert!(err.to_string().contains("inserting users"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_json_errors_convert() {
        fn parse(raw: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }

        let err = parse("{\"type\":").unwrap_err();
        assert!(matches!(err, SeedError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}

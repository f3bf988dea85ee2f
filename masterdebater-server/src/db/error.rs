//! Database error type
//!
//! Constraint violations are classified so callers can match on them, but
//! they are never swallowed: every store error reaches the caller.

use masterdebater_core::DebateError;
use sqlx::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },

    #[error("foreign key constraint violated: {message}")]
    ForeignKeyViolation { message: String },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("stored payload error: {0}")]
    Payload(#[from] DebateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let kind = e.as_database_error().map(|db| (db.kind(), db.message().to_owned()));
        match kind {
            Some((ErrorKind::UniqueViolation, message)) => Self::UniqueViolation { message },
            Some((ErrorKind::ForeignKeyViolation, message)) => {
                Self::ForeignKeyViolation { message }
            }
            _ => Self::Sqlx(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn out_of_range_display() {
        let err = DbError::OutOfRange {
            field: "turn_limit",
            value: 4_294_967_295,
        };
        assert_eq!(err.to_string(), "turn_limit out of range: 4294967295");
    }

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("debate", "abc");
        assert_eq!(err.to_string(), "not found: debate 'abc'");
    }
}

//! Shared classification of Diesel failures for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse failure classes the repositories translate into port errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// Any other query failure.
    Query(&'static str),
}

/// Classify a Diesel error, logging the raw detail at debug level only.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DeserializationError(_) => DieselFailure::Query("unreadable row"),
        _ => DieselFailure::Query("database error"),
    }
}

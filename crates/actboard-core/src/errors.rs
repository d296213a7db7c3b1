//! Typed error types for actboard-core.

use thiserror::Error;

/// Result type alias for cache refresh operations.
pub type CoreResult<T> = Result<T, CacheError>;

/// Errors reported by a [`QueryExecutor`](crate::query::QueryExecutor).
#[derive(Debug, Error)]
pub enum QueryError {
    /// The statement could not be prepared (bad SQL, missing table).
    #[error("Failed to prepare query `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The statement was prepared but failed while executing or stepping rows.
    #[error("Failed to execute query `{sql}`: {source}")]
    Execute {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A result row did not carry a field the caller asked for.
    #[error("Query result has no field '{field}'")]
    MissingField { field: String },
}

/// Errors that abort a cache refresh.
///
/// A refresh that returns one of these leaves the previously exposed rows
/// in place.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The group name cannot be turned into a safe table identifier.
    #[error("Invalid group name '{group}': only ASCII letters, digits and '_' are allowed")]
    InvalidGroupName { group: String },

    /// The membership lookup for a user failed.
    #[error("Membership lookup failed for user '{user}'")]
    Membership {
        user: String,
        #[source]
        source: QueryError,
    },

    /// The activity query for a single group failed.
    #[error("Activity query failed for group '{group}'")]
    GroupQuery {
        group: String,
        #[source]
        source: QueryError,
    },
}

/// Row or column index outside the current table bounds.
///
/// This is a caller contract violation; accessors never clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfRange {
    #[error("Row {index} out of range [0, {len})")]
    Row { index: usize, len: usize },

    #[error("Column {index} out of range [0, {len})")]
    Column { index: usize, len: usize },
}

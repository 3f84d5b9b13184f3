//! Error types for the store and notifier boundaries.

use thiserror::Error;

/// Errors from task store operations.
///
/// `NotFound` is distinct from `Persistence` so the API layer can map it to a
/// "not found" response instead of a generic server error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A read targeted a task id that does not exist.
    #[error("task not found: {0}")]
    NotFound(String),

    /// Any underlying database failure (connection, constraint, syntax).
    /// Always wraps the cause; never swallowed on the write path.
    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether this error is the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors from a notification transport.
///
/// Transport failures are logged by the scanner and recorded on the task;
/// they never abort a scan cycle.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The delivery channel failed (SMTP rejection, connection loss, ...).
    #[error("notification transport failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        let err = StoreError::NotFound("t1".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "task not found: t1");

        let err = StoreError::Persistence(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_not_found());
    }
}

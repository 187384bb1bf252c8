use thiserror::Error;

use crate::types::Recurrence;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A row is malformed or lacks a field its recurrence mode needs.
    #[error("Invalid entry in row {row}: {reason}")]
    Validation { row: u32, reason: String },

    /// The recurrence mode never produces a registration (Custom).
    #[error("Unsupported recurrence mode: {mode}")]
    UnsupportedMode { mode: Recurrence },

    /// No row references the given trigger uid.
    #[error("No row references trigger {uid}")]
    Resolution { uid: String },

    /// Mail dispatch failed for one target.
    #[error("Send to {to} failed: {reason}")]
    Send { to: String, reason: String },

    /// A trigger registration could not be removed.
    #[error("Failed to delete trigger {uid}: {reason}")]
    Deletion { uid: String, reason: String },

    /// The row store rejected a read or write.
    #[error("Row store error: {0}")]
    Store(String),

    /// The trigger platform rejected a create or list request.
    #[error("Trigger registry error: {0}")]
    Registry(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchedulerError {
    pub(crate) fn validation(row: u32, reason: impl Into<String>) -> Self {
        SchedulerError::Validation {
            row,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

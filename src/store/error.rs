use thiserror::Error;

/// Failure reported by a [`KeyValueStore`](super::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Everything a task store operation can report.
///
/// Validation errors leave state untouched. Storage and data errors are
/// non-fatal: the caller turns them into a notification and carries on.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task title cannot be empty!")]
    EmptyTitle,
    #[error("Task title cannot be longer than {max} characters")]
    TitleTooLong { max: usize },
    #[error("failed to read `{key}` from storage")]
    Read {
        key: &'static str,
        #[source]
        source: StorageError,
    },
    #[error("failed to write `{key}` to storage")]
    Write {
        key: &'static str,
        #[source]
        source: StorageError,
    },
    #[error("stored task list is not valid JSON")]
    Malformed(#[from] serde_json::Error),
    #[error("stored task list is invalid: {0}")]
    InvalidRecord(String),
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::EmptyTitle | TaskError::TitleTooLong { .. })
    }
}

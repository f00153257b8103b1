use thiserror::Error;

/// Errors from the persistence layer.
///
/// The prediction path itself never returns errors: missing or malformed
/// data surfaces as `None`/empty results so callers can render a plain
/// "no data available" message.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

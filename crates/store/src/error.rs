/// Error type for local storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not the expected JSON document.
    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Ambiguous filter: {0}")]
    AmbiguousFilter(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ExplorerError {
    /// Build a field-level validation error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ExplorerError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True for malformed filter input.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExplorerError::Validation { .. })
    }

    /// True for filter combinations rejected before any query runs.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ExplorerError::AmbiguousFilter(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

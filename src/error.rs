use thiserror::Error;

use crate::models::DocumentId;

/// Main error type for index operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Check if this error was caused by a malformed input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SearchError::InvalidArgument(_))
    }

    /// Check if this error refers to a missing document
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::DocumentNotFound(_))
    }
}

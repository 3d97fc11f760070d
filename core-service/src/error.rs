use core_library::LibraryError;
use thiserror::Error;

/// Failures surfaced to catalog clients
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed or out-of-range input; never reaches the store
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    /// Underlying persistence failure; detail is for logs only
    #[error("Store error: {0}")]
    Store(#[source] LibraryError),
}

impl CatalogError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_store(&self) -> bool {
        matches!(self, CatalogError::Store(_))
    }
}

impl From<LibraryError> for CatalogError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::InvalidInput { field, message } => {
                CatalogError::Validation { field, message }
            }
            LibraryError::NotFound { entity_type, .. } => {
                CatalogError::NotFound(format!("{} not found", entity_type.to_lowercase()))
            }
            other => CatalogError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

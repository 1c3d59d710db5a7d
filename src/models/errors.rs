use thiserror::Error;

/// Service-level errors surfaced to the HTTP layer.
///
/// The `Display` output of each variant is the exact string clients see
/// in the `error` field of the response envelope.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Producto no encontrado en el carrito")]
    ItemNotFound { user_id: String, product_id: String },

    #[error("{source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
        }
    }
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Store request failed: {message}")]
    Store { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

//! Error handling for the teamtrack application

pub mod types;

pub use types::*;

/// Result alias for application-level operations
pub type AppResult<T> = Result<T, AppError>;

/// Result alias for repository-level operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

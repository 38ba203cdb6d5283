use thiserror::Error;

use crate::database::DatabaseError;
use crate::validation::ValidationErrors;

/// Observer system errors with structured error types
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Validation error: {}", .0.summary())]
    Validation(ValidationErrors),

    /// Business rule refusal, e.g. deleting a row that still has children
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

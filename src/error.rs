use thiserror::Error;

/// Failures of the compute path. Lookup misses and unappliable patches are
/// ordinary return values, not errors.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid operation: {0:?} is marked both added and removed")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;

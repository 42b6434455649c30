use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheafError {
    #[error("Cyclic group order must be positive")]
    InvalidOrder,

    #[error("Character index out of range: index={index}, order={order}")]
    IndexOutOfRange { index: usize, order: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unknown patch '{0}'")]
    UnknownPatch(String),

    #[error("Solver has not been fitted")]
    NotFitted,

    #[error("Singular system: {0}")]
    SingularSystem(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SheafResult<T> = Result<T, SheafError>;

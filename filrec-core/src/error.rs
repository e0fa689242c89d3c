use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header or field table could not be read, or is not a plausible dBase layout.
    #[error("Structural error: {0}")]
    Structural(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Format error: {0}")]
    Format(String),
}

impl FilError {
    pub fn structural(msg: impl Into<String>) -> Self {
        FilError::Structural(msg.into())
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, FilError::Structural(_))
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, FilError>;

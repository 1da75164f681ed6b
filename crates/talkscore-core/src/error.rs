use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The transcript cannot be classified semantically (empty or blank).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The embedding backend or knowledge base failed or timed out.
    #[error("Semantic classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

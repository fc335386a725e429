use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ValidationErrors),

    #[error("invalid spin configuration: {0}")]
    InvalidConfiguration(String),

    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, SimError>;

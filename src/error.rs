//! Error taxonomy shared by the stores, the generator and the app service.
//!
//! A missing document is never an error: loads return `Option`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An operation needed a signed-in user and there was none.
    #[error("you must be logged in to do that")]
    Unauthorized,

    /// Input rejected before any remote call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model call itself failed (network, HTTP status, empty reply).
    #[error("routine generation failed: {0}")]
    Generation(String),

    /// The model answered, but not with something matching the output schema.
    #[error("model response did not match the routine schema: {0}")]
    InvalidResponse(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for errors raised locally before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Generation(err.to_string())
    }
}

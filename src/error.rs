use thiserror::Error;

/// Errors surfaced by the [`SecondBrain`](crate::SecondBrain) API.
///
/// Callers can match on the variants to map them onto their own responses;
/// storage and configuration failures arrive as [`BrainError::Other`] with the
/// full `anyhow` context chain attached.
#[derive(Debug, Error)]
pub enum BrainError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("username already exists: {0}")]
    UsernameTaken(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("content not found or unauthorized: {0}")]
    ContentNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Input validation ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid content id: {0}")]
    ContentId(String),

    #[error("{0} must be a valid URL")]
    Url(&'static str),
}

pub type BrainResult<T> = std::result::Result<T, BrainError>;

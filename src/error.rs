//! Request-level error taxonomy.

use crate::store::StoreError;
use crate::weave::WeaveError;
use thiserror::Error;

/// Errors surfaced at the request boundary.
///
/// Nothing here is retried; each variant maps to one HTTP status and the
/// message is the body shown to the caller.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("title must be alphanumeric, got `{0}`")]
    InvalidTitle(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("page `{0}` not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to weave `{title}`: {source}")]
    Weave {
        title: String,
        #[source]
        source: WeaveError,
    },
}

impl WikiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidTitle(_) => 400,
            Self::Unauthorized => 401,
            Self::NotFound(_) | Self::Store(StoreError::NotFound(_)) => 404,
            Self::Store(_) | Self::Weave { .. } => 500,
        }
    }
}

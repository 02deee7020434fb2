//! Error types for bracket operations.

use imagebracket_store::StorageError;
use imagebracket_types::{EntrantId, MatchId};
use thiserror::Error;

/// Result type for bracket operations.
pub type BracketResult<T> = Result<T, BracketError>;

/// Errors surfaced by the bracket engine.
#[derive(Debug, Error)]
pub enum BracketError {
    /// Entrant count is zero or not a power of two.
    #[error("entrant count must be a power of 2 (e.g., 8, 16), got {0}")]
    InvalidEntrantCount(usize),

    /// A caller-supplied identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    /// One or both slots are still pending.
    #[error("both competitors of match {0} must be determined before voting")]
    IncompleteMatch(MatchId),

    #[error("match {0} already completed")]
    MatchAlreadyDecided(MatchId),

    /// The proposed winner occupies neither slot.
    #[error("entrant {entrant} is not competing in match {match_id}")]
    InvalidWinner { match_id: MatchId, entrant: EntrantId },

    /// Too many entrants registered in one batch.
    #[error("at most {max} images per upload, got {got}")]
    UploadLimitExceeded { max: usize, got: usize },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl BracketError {
    /// Only persistence failures are worth retrying; everything else is a
    /// permanent rejection of the caller's input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

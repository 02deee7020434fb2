//! Core type definitions for the image bracket tournament.
//!
//! This crate defines the plain data shared by the store, the bracket
//! engine and the HTTP adapter:
//! - Entrant and match identifiers
//! - Entrants (uploaded images) and their metadata
//! - Matches, slots and the views returned to callers
//!
//! Nothing here touches storage or randomness; bracket construction and
//! winner propagation live in `imagebracket-engine`.

mod entrant;
mod ids;
mod matches;

pub use entrant::Entrant;
pub use ids::{EntrantId, MatchId};
pub use matches::{Advancement, Match, MatchView, Slot, TournamentStatus};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from parsing identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid match id: {0:?}")]
    InvalidMatchId(String),
}

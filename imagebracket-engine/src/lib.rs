//! Single-elimination bracket engine for the image tournament.
//!
//! - [`bracket`] builds every round's matches from a power-of-two field
//! - [`advance`] validates votes and computes where a winner goes next
//! - [`Tournament`] ties both to the entrant and match repositories
//!
//! Seeding randomness is injected through [`Shuffler`] so tests can fix the
//! pairing.

pub mod advance;
pub mod bracket;
mod error;
mod shuffle;
mod tournament;

pub use error::{BracketError, BracketResult};
pub use shuffle::{NoShuffle, SeededShuffler, Shuffler, ThreadRngShuffler};
pub use tournament::{MAX_UPLOAD_BATCH, Tournament};

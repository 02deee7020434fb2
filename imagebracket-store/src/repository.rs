use imagebracket_types::{Entrant, EntrantId, Match, MatchId, Slot};

use crate::StorageResult;

/// Keyed collection of entrants. Holds no bracket logic.
pub trait EntrantRepository: Send + Sync {
    /// Stores a newly registered entrant.
    fn insert_entrant(&self, entrant: &Entrant) -> StorageResult<()>;

    /// Returns every entrant in upload order.
    fn list_entrants(&self) -> StorageResult<Vec<Entrant>>;

    fn get_entrant(&self, id: &EntrantId) -> StorageResult<Option<Entrant>>;
}

/// Durable match storage for a single bracket.
pub trait MatchRepository: Send + Sync {
    /// Discards every stored match and inserts `matches`, atomically.
    fn replace_matches(&self, matches: &[Match]) -> StorageResult<()>;

    /// Returns every match ordered by round, then index.
    fn list_matches(&self) -> StorageResult<Vec<Match>>;

    fn get_match(&self, id: MatchId) -> StorageResult<Option<Match>>;

    fn find_match_at(&self, round: u32, index: u32) -> StorageResult<Option<Match>>;

    /// Highest round number present, `None` when no bracket exists.
    fn max_round(&self) -> StorageResult<Option<u32>>;

    /// Sets the winner only if none is recorded yet and both slots are filled.
    ///
    /// Returns `true` when this call wrote the winner.
    fn set_winner_if_undecided(&self, id: MatchId, winner: EntrantId) -> StorageResult<bool>;

    /// Writes `entrant` into one slot of the match at `(round, index)`,
    /// leaving every other field untouched.
    ///
    /// Returns `None` if no such match exists, otherwise the slot's
    /// previous occupant.
    fn set_slot(
        &self,
        round: u32,
        index: u32,
        slot: Slot,
        entrant: EntrantId,
    ) -> StorageResult<Option<Option<EntrantId>>>;
}

/// Both collections behind one backend, so they can be wiped together.
pub trait TournamentStore: EntrantRepository + MatchRepository {
    /// Removes every match and every entrant in a single transaction.
    fn clear_all(&self) -> StorageResult<()>;
}

//! Vote validation and the destination of a winner.

use imagebracket_types::{EntrantId, Match, Slot};

use crate::{BracketError, BracketResult};

/// Checks that `winner` may be recorded for `m`.
///
/// Order matters: a pending slot is reported before a decided match, and
/// both before an unknown winner.
pub fn check_vote(m: &Match, winner: &EntrantId) -> BracketResult<()> {
    if !m.is_ready() {
        return Err(BracketError::IncompleteMatch(m.id));
    }
    if m.is_decided() {
        return Err(BracketError::MatchAlreadyDecided(m.id));
    }
    if !m.contains(winner) {
        return Err(BracketError::InvalidWinner {
            match_id: m.id,
            entrant: *winner,
        });
    }
    Ok(())
}

/// Where the winner of `m` goes: `None` for the final of a bracket with
/// `final_round` rounds.
#[must_use]
pub fn destination(m: &Match, final_round: u32) -> Option<(u32, u32, Slot)> {
    (m.round < final_round).then(|| m.next_position())
}

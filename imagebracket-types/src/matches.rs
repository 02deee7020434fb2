//! Matches, slots and the read models built on top of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Entrant, EntrantId, MatchId};

/// One of the two entrant positions in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The slot a match at `index` feeds in the next round:
    /// even indices fill slot A, odd indices fill slot B.
    #[must_use]
    pub const fn for_index(index: u32) -> Self {
        if index % 2 == 0 { Self::A } else { Self::B }
    }

    /// Column name used by the store for this slot.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::A => "slot_a",
            Self::B => "slot_b",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A single pairing in the bracket.
///
/// Rounds are numbered from 1; `index` is the 0-based position within the
/// round. Round 1 is seeded at build time, later rounds start empty and are
/// filled as winners propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    pub index: u32,
    pub slot_a: Option<EntrantId>,
    pub slot_b: Option<EntrantId>,
    pub winner: Option<EntrantId>,
}

impl Match {
    /// Creates a match with both slots empty.
    #[must_use]
    pub const fn pending(id: MatchId, round: u32, index: u32) -> Self {
        Self {
            id,
            round,
            index,
            slot_a: None,
            slot_b: None,
            winner: None,
        }
    }

    /// Creates a match with both slots filled.
    #[must_use]
    pub const fn seeded(id: MatchId, round: u32, index: u32, a: EntrantId, b: EntrantId) -> Self {
        Self {
            id,
            round,
            index,
            slot_a: Some(a),
            slot_b: Some(b),
            winner: None,
        }
    }

    #[must_use]
    pub const fn occupant(&self, slot: Slot) -> Option<EntrantId> {
        match slot {
            Slot::A => self.slot_a,
            Slot::B => self.slot_b,
        }
    }

    /// Both slots are filled, so the match can be voted on.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.slot_a.is_some() && self.slot_b.is_some()
    }

    #[must_use]
    pub const fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns true if `entrant` occupies either slot.
    #[must_use]
    pub fn contains(&self, entrant: &EntrantId) -> bool {
        self.slot_a.as_ref() == Some(entrant) || self.slot_b.as_ref() == Some(entrant)
    }

    /// Position `(round, index, slot)` the winner of this match advances to.
    ///
    /// The caller decides whether that match exists; for the final it won't.
    #[must_use]
    pub const fn next_position(&self) -> (u32, u32, Slot) {
        (self.round + 1, self.index / 2, Slot::for_index(self.index))
    }
}

/// A match with its entrants resolved, as returned to callers listing the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: u32,
    pub index: u32,
    pub slot_a: Option<Entrant>,
    pub slot_b: Option<Entrant>,
    pub winner: Option<Entrant>,
}

/// Outcome of recording a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    /// The match that was just decided.
    pub decided: Match,
    /// The downstream match after the winner was written into it, if any.
    pub promoted_to: Option<Match>,
    /// Set when this vote decided the final.
    pub champion: Option<Entrant>,
}

impl Advancement {
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.champion.is_some()
    }
}

/// Summary of the current bracket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TournamentStatus {
    pub total_rounds: u32,
    pub total_matches: usize,
    pub decided_matches: usize,
    pub champion: Option<Entrant>,
}

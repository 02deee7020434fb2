//! Bracket construction.
//!
//! A bracket for `N` entrants (a power of two) has `log2(N)` rounds, round
//! `r` holding `N / 2^r` matches. Round 1 pairs consecutive entrants; every
//! later round starts with both slots empty and is filled by propagation.

use imagebracket_types::{Entrant, Match, MatchId};

use crate::shuffle::Shuffler;
use crate::{BracketError, BracketResult};

/// Returns true if `count` is a positive power of two.
#[must_use]
pub const fn is_valid_entrant_count(count: usize) -> bool {
    count > 0 && count & (count - 1) == 0
}

/// Number of rounds needed for `entrants` competitors.
pub fn round_count(entrants: usize) -> BracketResult<u32> {
    if !is_valid_entrant_count(entrants) {
        return Err(BracketError::InvalidEntrantCount(entrants));
    }
    Ok(entrants.trailing_zeros())
}

/// Number of matches in `round` (1-based) of a bracket for `entrants`.
#[must_use]
pub const fn matches_in_round(entrants: usize, round: u32) -> usize {
    entrants >> round
}

/// Builds every match of the bracket from `entrants` in their given order.
///
/// Entrants at positions `2i` and `2i + 1` meet in round 1, match `i`.
/// Ids are assigned from 1 in round-major, index-minor order.
pub fn build_matches(entrants: &[Entrant]) -> BracketResult<Vec<Match>> {
    let rounds = round_count(entrants.len())?;
    let mut matches = Vec::with_capacity(entrants.len() - 1);
    let mut id = MatchId::new(1);

    for (index, pair) in (0u32..).zip(entrants.chunks_exact(2)) {
        matches.push(Match::seeded(id, 1, index, pair[0].id, pair[1].id));
        id = id.next();
    }

    for round in 2..=rounds {
        for index in 0..matches_in_round(entrants.len(), round) {
            let index = u32::try_from(index)
                .map_err(|_| BracketError::InvalidEntrantCount(entrants.len()))?;
            matches.push(Match::pending(id, round, index));
            id = id.next();
        }
    }

    Ok(matches)
}

/// Shuffles `entrants` with `shuffler`, then builds the bracket.
///
/// The count is checked before shuffling so an invalid field is rejected
/// without consuming randomness.
pub fn seed_bracket(
    mut entrants: Vec<Entrant>,
    shuffler: &dyn Shuffler,
) -> BracketResult<Vec<Match>> {
    round_count(entrants.len())?;
    shuffler.shuffle(&mut entrants);
    build_matches(&entrants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_counts() {
        assert!(is_valid_entrant_count(1));
        assert!(is_valid_entrant_count(2));
        assert!(is_valid_entrant_count(64));
        assert!(!is_valid_entrant_count(0));
        assert!(!is_valid_entrant_count(6));
    }

    #[test]
    fn round_count_is_log2() {
        assert_eq!(round_count(2).unwrap(), 1);
        assert_eq!(round_count(8).unwrap(), 3);
        assert_eq!(round_count(1024).unwrap(), 10);
    }

    #[test]
    fn matches_per_round() {
        assert_eq!(matches_in_round(16, 1), 8);
        assert_eq!(matches_in_round(16, 4), 1);
    }

    #[test]
    fn single_entrant_builds_nothing() {
        let matches = build_matches(&[Entrant::new("solo.png")]).unwrap();
        assert!(matches.is_empty());
    }
}

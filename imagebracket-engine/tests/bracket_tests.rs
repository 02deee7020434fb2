//! Shape properties of freshly built brackets.

use imagebracket_engine::bracket::{build_matches, round_count, seed_bracket};
use imagebracket_engine::{BracketError, NoShuffle, SeededShuffler};
use imagebracket_types::{Entrant, EntrantId, MatchId};
use proptest::prelude::*;
use std::collections::HashSet;

fn entrants(n: usize) -> Vec<Entrant> {
    (0..n).map(|i| Entrant::new(&format!("e{i}.png"))).collect()
}

#[test]
fn two_entrants_make_one_ready_match() {
    let field = entrants(2);
    let matches = build_matches(&field).unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!((m.round, m.index), (1, 0));
    assert_eq!(m.slot_a, Some(field[0].id));
    assert_eq!(m.slot_b, Some(field[1].id));
    assert!(m.winner.is_none());
}

#[test]
fn consecutive_entrants_are_paired() {
    let field = entrants(8);
    let matches = build_matches(&field).unwrap();
    for (i, m) in matches.iter().filter(|m| m.round == 1).enumerate() {
        assert_eq!(m.index as usize, i);
        assert_eq!(m.slot_a, Some(field[2 * i].id));
        assert_eq!(m.slot_b, Some(field[2 * i + 1].id));
    }
}

#[test]
fn later_rounds_start_empty() {
    let matches = build_matches(&entrants(8)).unwrap();
    for m in matches.iter().filter(|m| m.round > 1) {
        assert!(m.slot_a.is_none() && m.slot_b.is_none() && m.winner.is_none());
    }
}

#[test]
fn ids_follow_build_order() {
    let matches = build_matches(&entrants(8)).unwrap();
    let ids: Vec<u64> = matches.iter().map(|m| m.id.get()).collect();
    assert_eq!(ids, (1..=7).collect::<Vec<_>>());
    let positions: Vec<(u32, u32)> = matches.iter().map(|m| (m.round, m.index)).collect();
    assert_eq!(
        positions,
        vec![(1, 0), (1, 1), (1, 2), (1, 3), (2, 0), (2, 1), (3, 0)]
    );
    assert_eq!(matches.last().unwrap().id, MatchId::new(7));
}

#[test]
fn five_entrants_are_rejected() {
    let err = build_matches(&entrants(5)).unwrap_err();
    assert!(matches!(err, BracketError::InvalidEntrantCount(5)));
}

#[test]
fn zero_entrants_are_rejected() {
    assert!(matches!(round_count(0), Err(BracketError::InvalidEntrantCount(0))));
    assert!(matches!(
        seed_bracket(Vec::new(), &NoShuffle),
        Err(BracketError::InvalidEntrantCount(0))
    ));
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let field = entrants(16);
    let a = seed_bracket(field.clone(), &SeededShuffler::new(7)).unwrap();
    let b = seed_bracket(field, &SeededShuffler::new(7)).unwrap();
    assert_eq!(a, b);
}

proptest! {
    /// N-1 matches in total, N / 2^r in round r, every entrant seeded exactly once.
    #[test]
    fn bracket_shape_holds_for_powers_of_two(exp in 1u32..8, seed in any::<u64>()) {
        let n = 1usize << exp;
        let field = entrants(n);
        let matches = seed_bracket(field.clone(), &SeededShuffler::new(seed)).unwrap();

        prop_assert_eq!(matches.len(), n - 1);
        for round in 1..=exp {
            let in_round: Vec<_> = matches.iter().filter(|m| m.round == round).collect();
            prop_assert_eq!(in_round.len(), n >> round);
            let indices: Vec<u32> = in_round.iter().map(|m| m.index).collect();
            prop_assert_eq!(indices, (0..(n >> round) as u32).collect::<Vec<_>>());
        }

        let seeded: HashSet<EntrantId> = matches
            .iter()
            .filter(|m| m.round == 1)
            .flat_map(|m| [m.slot_a.unwrap(), m.slot_b.unwrap()])
            .collect();
        let expected: HashSet<EntrantId> = field.iter().map(|e| e.id).collect();
        prop_assert_eq!(seeded, expected);

        let ids: HashSet<MatchId> = matches.iter().map(|m| m.id).collect();
        prop_assert_eq!(ids.len(), matches.len());
    }

    #[test]
    fn non_powers_of_two_are_rejected(n in 3usize..300) {
        prop_assume!(!n.is_power_of_two());
        let rejected = matches!(
            build_matches(&entrants(n)),
            Err(BracketError::InvalidEntrantCount(c)) if c == n
        );
        prop_assert!(rejected);
    }
}

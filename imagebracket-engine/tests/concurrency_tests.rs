//! Concurrent voting against one shared tournament.

mod common;

use common::{ordered_tournament, register};
use imagebracket_engine::BracketError;
use std::sync::Barrier;
use std::thread;

#[test]
fn duplicate_votes_on_one_match_decide_it_once() {
    let t = ordered_tournament();
    let field = register(&t, 2);
    let m = t.build_bracket().unwrap().remove(0);
    let voters = 8;
    let barrier = Barrier::new(voters);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..voters)
            .map(|i| {
                let (t, barrier, field) = (&t, &barrier, &field);
                s.spawn(move || {
                    barrier.wait();
                    t.record_winner(m.id, field[i % 2].id)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for r in &results {
        if let Err(e) = r {
            assert!(matches!(e, BracketError::MatchAlreadyDecided(_)), "{e}");
        }
    }

    let stored = t.get_match(m.id).unwrap().unwrap();
    assert_eq!(stored.winner, winners[0].decided.winner);
    assert_eq!(t.current_champion().unwrap().map(|c| c.id), stored.winner);
}

#[test]
fn sibling_votes_both_reach_the_next_round() {
    let t = ordered_tournament();
    register(&t, 16);
    let round_one: Vec<_> = t
        .build_bracket()
        .unwrap()
        .into_iter()
        .filter(|m| m.round == 1)
        .collect();
    let barrier = Barrier::new(round_one.len());

    thread::scope(|s| {
        for m in &round_one {
            let (t, barrier) = (&t, &barrier);
            s.spawn(move || {
                barrier.wait();
                let winner = if m.index % 3 == 0 { m.slot_b } else { m.slot_a };
                t.record_winner(m.id, winner.unwrap()).unwrap();
            });
        }
    });

    for index in 0..4 {
        let next = t.find_match(2, index).unwrap().unwrap();
        let feeders: Vec<_> = round_one
            .iter()
            .filter(|m| m.index / 2 == index)
            .map(|m| t.get_match(m.id).unwrap().unwrap().winner)
            .collect();
        assert_eq!(vec![next.slot_a, next.slot_b], feeders);
        assert!(next.is_ready());
    }
}

#[test]
fn votes_during_rebuild_never_see_a_partial_bracket() {
    let t = ordered_tournament();
    register(&t, 8);
    t.build_bracket().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..20 {
                t.build_bracket().unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let matches = t.list_matches().unwrap();
                assert!(matches.is_empty() || matches.len() == 7);
                if let Some(m) = matches.iter().find(|m| m.round == 1 && m.winner.is_none()) {
                    let winner = m.slot_a.as_ref().unwrap().id;
                    match t.record_winner(m.id, winner) {
                        Ok(_) => {}
                        // A rebuild between listing and voting reseats the match.
                        Err(
                            BracketError::MatchAlreadyDecided(_)
                            | BracketError::InvalidWinner { .. },
                        ) => {}
                        Err(e) => panic!("unexpected vote error: {e}"),
                    }
                }
            }
        });
    });

    assert_eq!(t.list_matches().unwrap().len(), 7);
}

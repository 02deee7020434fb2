//! Shared test helpers for engine tests.

#![allow(dead_code)]

use imagebracket_engine::{NoShuffle, Shuffler, Tournament};
use imagebracket_store::SqliteStore;
use imagebracket_types::{Entrant, EntrantId, Match};

/// Reverses the store order, giving a known non-trivial permutation.
pub struct ReverseShuffler;

impl Shuffler for ReverseShuffler {
    fn shuffle(&self, entrants: &mut [Entrant]) {
        entrants.reverse();
    }
}

/// Tournament over an in-memory store that keeps upload order.
pub fn ordered_tournament() -> Tournament {
    Tournament::with_sqlite(SqliteStore::open_in_memory().unwrap(), Box::new(NoShuffle))
}

/// Registers `n` entrants named `img-<i>.png`, returning them in upload order.
pub fn register(tournament: &Tournament, n: usize) -> Vec<Entrant> {
    let mut all = Vec::with_capacity(n);
    let names: Vec<String> = (0..n).map(|i| format!("img-{i}.png")).collect();
    for chunk in names.chunks(imagebracket_engine::MAX_UPLOAD_BATCH) {
        all.extend(tournament.register_entrants(chunk).unwrap());
    }
    all
}

/// Decides every ready, undecided match in `round` in favour of slot A.
pub fn decide_round_for_slot_a(tournament: &Tournament, round: u32) -> Vec<EntrantId> {
    let round_matches: Vec<Match> = tournament
        .list_matches()
        .unwrap()
        .into_iter()
        .filter(|m| m.round == round)
        .map(|m| tournament.get_match(m.id).unwrap().unwrap())
        .collect();

    let mut winners = Vec::new();
    for m in round_matches {
        let winner = m.slot_a.unwrap();
        tournament.record_winner(m.id, winner).unwrap();
        winners.push(winner);
    }
    winners
}

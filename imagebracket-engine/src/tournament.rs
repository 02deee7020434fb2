//! The tournament service: entrants, bracket build, voting and queries.
//!
//! Bracket builds and resets take the write side of an internal gate for
//! their whole duration; votes and queries take the read side. A vote can
//! therefore never land on a half-rebuilt bracket, while votes on different
//! matches proceed concurrently and rely on the store's conditional and
//! field-level updates.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use imagebracket_store::{EntrantRepository, MatchRepository, SqliteStore, TournamentStore};
use imagebracket_types::{
    Advancement, Entrant, EntrantId, Match, MatchId, MatchView, Slot, TournamentStatus,
};
use tracing::{debug, info, warn};

use crate::advance::{check_vote, destination};
use crate::bracket::seed_bracket;
use crate::shuffle::Shuffler;
use crate::{BracketError, BracketResult};

/// Maximum number of images accepted in one upload.
pub const MAX_UPLOAD_BATCH: usize = 8;

/// A single global image tournament.
pub struct Tournament {
    store: Arc<dyn TournamentStore>,
    shuffler: Box<dyn Shuffler>,
    gate: RwLock<()>,
}

impl Tournament {
    pub fn new(store: Arc<dyn TournamentStore>, shuffler: Box<dyn Shuffler>) -> Self {
        Self {
            store,
            shuffler,
            gate: RwLock::new(()),
        }
    }

    pub fn with_sqlite(store: SqliteStore, shuffler: Box<dyn Shuffler>) -> Self {
        Self::new(Arc::new(store), shuffler)
    }

    // The gate guards no data, so a poisoned lock is still safe to use.
    fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Entrants ─────────────────────────────────────────────────

    /// Registers a single uploaded image.
    pub fn register_entrant(&self, filename: &str) -> BracketResult<Entrant> {
        let mut uploaded = self.register_entrants(&[filename])?;
        uploaded
            .pop()
            .ok_or_else(|| BracketError::InvalidIdentifier("empty upload".to_string()))
    }

    /// Registers a batch of uploaded images, at most [`MAX_UPLOAD_BATCH`].
    ///
    /// Every filename is validated before any entrant is stored.
    pub fn register_entrants<S: AsRef<str>>(&self, filenames: &[S]) -> BracketResult<Vec<Entrant>> {
        if filenames.len() > MAX_UPLOAD_BATCH {
            return Err(BracketError::UploadLimitExceeded {
                max: MAX_UPLOAD_BATCH,
                got: filenames.len(),
            });
        }
        for name in filenames {
            validate_filename(name.as_ref())?;
        }

        let _gate = self.read_gate();
        let mut uploaded = Vec::with_capacity(filenames.len());
        for name in filenames {
            let entrant = Entrant::new(name.as_ref().trim());
            self.store.insert_entrant(&entrant)?;
            debug!("Registered entrant {} ({})", entrant.id, entrant.filename);
            uploaded.push(entrant);
        }
        Ok(uploaded)
    }

    pub fn list_entrants(&self) -> BracketResult<Vec<Entrant>> {
        let _gate = self.read_gate();
        Ok(self.store.list_entrants()?)
    }

    // ── Bracket ──────────────────────────────────────────────────

    /// Seeds a fresh bracket from every registered entrant, replacing any
    /// existing one. Nothing is written if the entrant count is invalid.
    pub fn build_bracket(&self) -> BracketResult<Vec<Match>> {
        let _gate = self.write_gate();
        self.build_locked()
    }

    /// Like [`Tournament::build_bracket`], but returns the new bracket with
    /// entrants resolved. No other call can run between build and read.
    pub fn build_bracket_views(&self) -> BracketResult<Vec<MatchView>> {
        let _gate = self.write_gate();
        let matches = self.build_locked()?;
        self.views(matches)
    }

    fn build_locked(&self) -> BracketResult<Vec<Match>> {
        let entrants = self.store.list_entrants()?;
        let count = entrants.len();
        let matches = seed_bracket(entrants, self.shuffler.as_ref())?;
        self.store.replace_matches(&matches)?;
        info!("Built bracket: {} entrants, {} matches", count, matches.len());
        Ok(matches)
    }

    // ── Voting ───────────────────────────────────────────────────

    /// Parses raw identifiers and records the vote.
    pub fn record_vote(&self, match_id: &str, winner: &str) -> BracketResult<Advancement> {
        let match_id = MatchId::parse(match_id).map_err(|_| {
            BracketError::InvalidIdentifier(format!("invalid match id {match_id:?}"))
        })?;
        let winner = EntrantId::parse(winner).map_err(|_| {
            BracketError::InvalidIdentifier(format!("invalid winner id {winner:?}"))
        })?;
        self.record_winner(match_id, winner)
    }

    /// Records `winner` for the match and advances them to the next round.
    pub fn record_winner(
        &self,
        match_id: MatchId,
        winner: EntrantId,
    ) -> BracketResult<Advancement> {
        let _gate = self.read_gate();

        let m = self
            .store
            .get_match(match_id)?
            .ok_or(BracketError::MatchNotFound(match_id))?;
        check_vote(&m, &winner)?;

        if !self.store.set_winner_if_undecided(match_id, winner)? {
            // Another vote on this match landed between the read and the write.
            return Err(BracketError::MatchAlreadyDecided(match_id));
        }
        debug!("Match {} (round {}, index {}) won by {}", match_id, m.round, m.index, winner);

        let decided = Match {
            winner: Some(winner),
            ..m
        };
        let final_round = self.store.max_round()?.unwrap_or(decided.round);

        let (promoted_to, champion) = match destination(&decided, final_round) {
            Some((round, index, slot)) => (self.promote(round, index, slot, winner)?, None),
            None => {
                let champion = self.store.get_entrant(&winner)?;
                if let Some(champ) = &champion {
                    info!("Final winner decided: {} ({})", champ.id, champ.filename);
                }
                (None, champion)
            }
        };

        Ok(Advancement {
            decided,
            promoted_to,
            champion,
        })
    }

    fn promote(
        &self,
        round: u32,
        index: u32,
        slot: Slot,
        winner: EntrantId,
    ) -> BracketResult<Option<Match>> {
        let Some(previous) = self.store.set_slot(round, index, slot, winner)? else {
            warn!("No match at round {} index {} to receive {}", round, index, winner);
            return Ok(None);
        };
        if let Some(prev) = previous.filter(|p| *p != winner) {
            warn!(
                "Replaced {} with {} in slot {} of round {} match {}",
                prev, winner, slot, round, index
            );
        }
        debug!("Advanced {} to round {} match {} slot {}", winner, round, index, slot);
        Ok(self.store.find_match_at(round, index)?)
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Every match in round/index order, with entrants resolved.
    pub fn list_matches(&self) -> BracketResult<Vec<MatchView>> {
        let _gate = self.read_gate();
        self.views(self.store.list_matches()?)
    }

    fn views(&self, matches: Vec<Match>) -> BracketResult<Vec<MatchView>> {
        let entrants: HashMap<EntrantId, Entrant> = self
            .store
            .list_entrants()?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();
        let resolve = |id: Option<EntrantId>| id.and_then(|id| entrants.get(&id).cloned());

        Ok(matches
            .into_iter()
            .map(|m| MatchView {
                id: m.id,
                round: m.round,
                index: m.index,
                slot_a: resolve(m.slot_a),
                slot_b: resolve(m.slot_b),
                winner: resolve(m.winner),
            })
            .collect())
    }

    pub fn get_match(&self, match_id: MatchId) -> BracketResult<Option<Match>> {
        let _gate = self.read_gate();
        Ok(self.store.get_match(match_id)?)
    }

    pub fn find_match(&self, round: u32, index: u32) -> BracketResult<Option<Match>> {
        let _gate = self.read_gate();
        Ok(self.store.find_match_at(round, index)?)
    }

    /// The winner of the final, or `None` while undecided or before any build.
    pub fn current_champion(&self) -> BracketResult<Option<Entrant>> {
        let _gate = self.read_gate();
        self.champion()
    }

    pub fn status(&self) -> BracketResult<TournamentStatus> {
        let _gate = self.read_gate();
        let matches = self.store.list_matches()?;
        Ok(TournamentStatus {
            total_rounds: matches.iter().map(|m| m.round).max().unwrap_or(0),
            total_matches: matches.len(),
            decided_matches: matches.iter().filter(|m| m.is_decided()).count(),
            champion: self.champion()?,
        })
    }

    fn champion(&self) -> BracketResult<Option<Entrant>> {
        let Some(final_round) = self.store.max_round()? else {
            return Ok(None);
        };
        let winner = self
            .store
            .find_match_at(final_round, 0)?
            .and_then(|m| m.winner);
        match winner {
            Some(id) => Ok(self.store.get_entrant(&id)?),
            None => Ok(None),
        }
    }

    // ── Reset ────────────────────────────────────────────────────

    /// Discards the bracket and every entrant.
    pub fn reset(&self) -> BracketResult<()> {
        let _gate = self.write_gate();
        self.store.clear_all()?;
        info!("Tournament reset");
        Ok(())
    }
}

fn validate_filename(name: &str) -> BracketResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BracketError::InvalidIdentifier("empty filename".to_string()));
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(BracketError::InvalidIdentifier(format!("invalid filename {name:?}")));
    }
    Ok(())
}

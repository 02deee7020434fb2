//! SQLite-backed implementation of both repositories.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use imagebracket_types::{Entrant, EntrantId, Match, MatchId, Slot};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::{EntrantRepository, MatchRepository, StorageError, StorageResult, TournamentStore};

const MATCH_COLUMNS: &str = "id, round, idx, slot_a, slot_b, winner";

/// Persistent store for entrants and matches backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!("Opened bracket store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entrants (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                path TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY,
                round INTEGER NOT NULL,
                idx INTEGER NOT NULL,
                slot_a TEXT,
                slot_b TEXT,
                winner TEXT,
                UNIQUE(round, idx)
            );
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

// ── Row decoding ─────────────────────────────────────────────────

type EntrantRow = (String, String, String, String);
type MatchRow = (i64, i64, i64, Option<String>, Option<String>, Option<String>);

fn read_entrant_row(row: &Row<'_>) -> rusqlite::Result<EntrantRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn read_match_row(row: &Row<'_>) -> rusqlite::Result<MatchRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode_entrant((id, filename, path, uploaded_at): EntrantRow) -> StorageResult<Entrant> {
    let id = parse_entrant_id(&id)?;
    let uploaded_at = DateTime::parse_from_rfc3339(&uploaded_at)
        .map_err(|e| {
            StorageError::InvalidData(format!("invalid uploaded_at {uploaded_at:?}: {e}"))
        })?
        .with_timezone(&Utc);
    Ok(Entrant {
        id,
        filename,
        path,
        uploaded_at,
    })
}

fn decode_match((id, round, idx, slot_a, slot_b, winner): MatchRow) -> StorageResult<Match> {
    let id = u64::try_from(id)
        .map_err(|_| StorageError::InvalidData(format!("negative match id {id}")))?;
    Ok(Match {
        id: MatchId::new(id),
        round: to_u32(round, "round")?,
        index: to_u32(idx, "idx")?,
        slot_a: slot_a.as_deref().map(parse_entrant_id).transpose()?,
        slot_b: slot_b.as_deref().map(parse_entrant_id).transpose()?,
        winner: winner.as_deref().map(parse_entrant_id).transpose()?,
    })
}

fn parse_entrant_id(s: &str) -> StorageResult<EntrantId> {
    EntrantId::parse(s)
        .map_err(|e| StorageError::InvalidData(format!("invalid entrant id {s:?}: {e}")))
}

fn to_u32(value: i64, column: &str) -> StorageResult<u32> {
    u32::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("{column} out of range: {value}")))
}

fn match_id_param(id: MatchId) -> StorageResult<i64> {
    i64::try_from(id.get())
        .map_err(|_| StorageError::InvalidData(format!("match id out of range: {id}")))
}

// ── Entrants ─────────────────────────────────────────────────────

impl EntrantRepository for SqliteStore {
    fn insert_entrant(&self, entrant: &Entrant) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO entrants (id, filename, path, uploaded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                entrant.id.to_string(),
                entrant.filename,
                entrant.path,
                entrant.uploaded_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )?;
        Ok(())
    }

    fn list_entrants(&self) -> StorageResult<Vec<Entrant>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, filename, path, uploaded_at FROM entrants ORDER BY rowid")?;
        let rows = stmt.query_map([], read_entrant_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(decode_entrant(row?)?);
        }
        Ok(result)
    }

    fn get_entrant(&self, id: &EntrantId) -> StorageResult<Option<Entrant>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, filename, path, uploaded_at FROM entrants WHERE id = ?1",
                params![id.to_string()],
                read_entrant_row,
            )
            .optional()?;
        row.map(decode_entrant).transpose()
    }
}

// ── Matches ──────────────────────────────────────────────────────

impl MatchRepository for SqliteStore {
    fn replace_matches(&self, matches: &[Match]) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM matches", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO matches (id, round, idx, slot_a, slot_b, winner)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for m in matches {
                stmt.execute(params![
                    match_id_param(m.id)?,
                    i64::from(m.round),
                    i64::from(m.index),
                    m.slot_a.map(|e| e.to_string()),
                    m.slot_b.map(|e| e.to_string()),
                    m.winner.map(|e| e.to_string()),
                ])?;
            }
        }
        tx.commit()?;
        debug!("Stored {} matches", matches.len());
        Ok(())
    }

    fn list_matches(&self) -> StorageResult<Vec<Match>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY round, idx"))?;
        let rows = stmt.query_map([], read_match_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(decode_match(row?)?);
        }
        Ok(result)
    }

    fn get_match(&self, id: MatchId) -> StorageResult<Option<Match>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
                params![match_id_param(id)?],
                read_match_row,
            )
            .optional()?;
        row.map(decode_match).transpose()
    }

    fn find_match_at(&self, round: u32, index: u32) -> StorageResult<Option<Match>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE round = ?1 AND idx = ?2"),
                params![i64::from(round), i64::from(index)],
                read_match_row,
            )
            .optional()?;
        row.map(decode_match).transpose()
    }

    fn max_round(&self) -> StorageResult<Option<u32>> {
        let conn = self.lock()?;
        let max: Option<i64> =
            conn.query_row("SELECT MAX(round) FROM matches", [], |row| row.get(0))?;
        max.map(|r| to_u32(r, "round")).transpose()
    }

    fn set_winner_if_undecided(&self, id: MatchId, winner: EntrantId) -> StorageResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE matches SET winner = ?1
             WHERE id = ?2 AND winner IS NULL AND slot_a IS NOT NULL AND slot_b IS NOT NULL",
            params![winner.to_string(), match_id_param(id)?],
        )?;
        Ok(changed == 1)
    }

    fn set_slot(
        &self,
        round: u32,
        index: u32,
        slot: Slot,
        entrant: EntrantId,
    ) -> StorageResult<Option<Option<EntrantId>>> {
        let column = slot.column();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let previous: Option<Option<String>> = tx
            .query_row(
                &format!("SELECT {column} FROM matches WHERE round = ?1 AND idx = ?2"),
                params![i64::from(round), i64::from(index)],
                |row| row.get(0),
            )
            .optional()?;
        let Some(previous) = previous else {
            return Ok(None);
        };
        tx.execute(
            &format!("UPDATE matches SET {column} = ?1 WHERE round = ?2 AND idx = ?3"),
            params![entrant.to_string(), i64::from(round), i64::from(index)],
        )?;
        tx.commit()?;
        Ok(Some(previous.as_deref().map(parse_entrant_id).transpose()?))
    }
}

// ── Reset ────────────────────────────────────────────────────────

impl TournamentStore for SqliteStore {
    fn clear_all(&self) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let matches = tx.execute("DELETE FROM matches", [])?;
        let entrants = tx.execute("DELETE FROM entrants", [])?;
        tx.commit()?;
        debug!("Cleared {} matches and {} entrants", matches, entrants);
        Ok(())
    }
}

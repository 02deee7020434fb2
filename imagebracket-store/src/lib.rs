//! SQLite storage layer for the image bracket.
//!
//! Provides persistent storage for entrants and matches behind two
//! repository traits, so the bracket engine never sees SQL.
//!
//! # Architecture
//!
//! - `EntrantRepository` is a plain keyed collection of uploaded images
//! - `MatchRepository` supports replace-all, lookups by id and by
//!   `(round, index)`, and field-level updates of a single match
//! - `TournamentStore` joins the two and wipes them together on reset
//! - `SqliteStore` implements all three on one connection
//!
//! Winner writes are conditional (`winner IS NULL`) and slot writes touch a
//! single column, so two votes finishing sibling matches both land.

mod error;
mod repository;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use repository::{EntrantRepository, MatchRepository, TournamentStore};
pub use sqlite::SqliteStore;

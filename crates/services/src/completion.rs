//! Date-scoped record of which games were finished today.
//!
//! The cache answers membership queries synchronously so routing decisions
//! never wait on the network; it is backed by fast local storage only. The
//! set is add-only within a day and implicitly resets when the date changes:
//! loading under a different date yields an empty set, with no migration of
//! stale data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

use exercise_core::Clock;
use exercise_core::model::GameType;

use crate::error::CompletionStoreError;

/// Local backing store for the completion set.
///
/// Implementations must not perform network I/O.
pub trait CompletionStore: Send + Sync {
    /// Load the set recorded for `date`; empty if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `CompletionStoreError` if the backing medium fails.
    fn load(&self, date: NaiveDate) -> Result<HashSet<GameType>, CompletionStoreError>;

    /// Persist the set for `date`.
    ///
    /// # Errors
    ///
    /// Returns `CompletionStoreError` if the backing medium fails.
    fn save(
        &self,
        date: NaiveDate,
        games: &HashSet<GameType>,
    ) -> Result<(), CompletionStoreError>;
}

/// Process-local store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCompletionStore {
    days: Arc<Mutex<HashMap<NaiveDate, HashSet<GameType>>>>,
}

impl InMemoryCompletionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionStore for InMemoryCompletionStore {
    fn load(&self, date: NaiveDate) -> Result<HashSet<GameType>, CompletionStoreError> {
        let guard = self.days.lock().map_err(|_| CompletionStoreError::Poisoned)?;
        Ok(guard.get(&date).cloned().unwrap_or_default())
    }

    fn save(
        &self,
        date: NaiveDate,
        games: &HashSet<GameType>,
    ) -> Result<(), CompletionStoreError> {
        let mut guard = self.days.lock().map_err(|_| CompletionStoreError::Poisoned)?;
        guard.insert(date, games.clone());
        Ok(())
    }
}

/// One JSON document on disk holding the latest recorded day.
///
/// Slugs of games that no longer exist are skipped on load rather than
/// erroring, so stale data from a removed game cannot wedge sequencing.
#[derive(Debug, Serialize, Deserialize)]
struct CompletionDoc {
    date: NaiveDate,
    games: Vec<String>,
}

/// File-backed store, the local analogue of browser storage.
#[derive(Clone)]
pub struct JsonFileCompletionStore {
    path: PathBuf,
}

impl JsonFileCompletionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CompletionStore for JsonFileCompletionStore {
    fn load(&self, date: NaiveDate) -> Result<HashSet<GameType>, CompletionStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: CompletionDoc = serde_json::from_str(&raw)?;
        if doc.date != date {
            return Ok(HashSet::new());
        }
        Ok(doc
            .games
            .iter()
            .filter_map(|slug| slug.parse::<GameType>().ok())
            .collect())
    }

    fn save(
        &self,
        date: NaiveDate,
        games: &HashSet<GameType>,
    ) -> Result<(), CompletionStoreError> {
        let mut slugs: Vec<String> = games.iter().map(|g| g.slug().to_owned()).collect();
        slugs.sort_unstable();
        let doc = CompletionDoc { date, games: slugs };
        fs::write(&self.path, serde_json::to_vec(&doc)?)?;
        Ok(())
    }
}

/// Today's completed-games set, keyed on the clock's current date.
///
/// All store failures are absorbed: reads degrade to the empty set and
/// failed writes are dropped with a warning. A missing completion mark only
/// means the same game is offered again, which is harmless.
#[derive(Clone)]
pub struct CompletionCache {
    clock: Clock,
    store: Arc<dyn CompletionStore>,
}

impl CompletionCache {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn CompletionStore>) -> Self {
        Self { clock, store }
    }

    /// Cache over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryCompletionStore::new()))
    }

    /// Record that `game` was finished today. Idempotent.
    pub fn mark_completed(&self, game: GameType) {
        let today = self.clock.today();
        let mut games = self.load_or_empty(today);
        if !games.insert(game) {
            return;
        }
        if let Err(e) = self.store.save(today, &games) {
            warn!(game = %game, error = %e, "failed to persist completion mark");
        }
    }

    /// The set of games finished on the clock's current date.
    #[must_use]
    pub fn completed_today(&self) -> HashSet<GameType> {
        self.load_or_empty(self.clock.today())
    }

    fn load_or_empty(&self, date: NaiveDate) -> HashSet<GameType> {
        match self.store.load(date) {
            Ok(games) => games,
            Err(e) => {
                warn!(error = %e, "failed to read completion cache");
                HashSet::new()
            }
        }
    }
}

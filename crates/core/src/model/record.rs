use chrono::{DateTime, Utc};

use crate::model::{GameType, ProgressSnapshot};

/// Persisted shape of one game session.
///
/// A session maps to at most one record in the store: the first persisted
/// snapshot creates it, every later snapshot overwrites it in full
/// (last-writer-wins). `created_at` is set once at first persistence and
/// never changes across updates.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    game_type: GameType,
    snapshot: ProgressSnapshot,
    created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build the record persisted for a snapshot.
    #[must_use]
    pub fn from_snapshot(
        game_type: GameType,
        snapshot: &ProgressSnapshot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            game_type,
            snapshot: snapshot.clone(),
            created_at,
        }
    }

    #[must_use]
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    #[must_use]
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the progress state, keeping `created_at`.
    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.snapshot = snapshot.clone();
    }
}

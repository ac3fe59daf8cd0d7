//! Best-effort persistence of in-progress game sessions.
//!
//! Per visit a session moves `NotStarted → InProgress → Complete`: the game
//! screen calls [`SessionTracker::update_session`] on every observable
//! progress change, and the call that carries a complete snapshot also marks
//! the completion cache. There is no failed terminal state — storage errors
//! are logged and swallowed so a backend hiccup can never interrupt the
//! exercise, and the next progress event upserts fresher full state anyway.
//!
//! Updates are issued in event order but not awaited by the UI, so their
//! network calls may complete out of order; every snapshot is a full-state
//! overwrite, making the persisted row converge to the last-issued update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

use exercise_core::Clock;
use exercise_core::model::{GameType, ProgressSnapshot, RecordId, SessionId, SessionRecord};
use storage::repository::{SessionRecordRepository, SessionRecordRow};

use crate::completion::CompletionCache;

/// Upserts session records and feeds the completion cache.
pub struct SessionTracker {
    clock: Clock,
    records: Arc<dyn SessionRecordRepository>,
    completions: CompletionCache,
    // SessionId -> store row, kept for the process lifetime so later
    // snapshots update in place instead of inserting duplicates.
    open_sessions: Mutex<HashMap<SessionId, RecordId>>,
}

impl SessionTracker {
    #[must_use]
    pub fn new(
        clock: Clock,
        records: Arc<dyn SessionRecordRepository>,
        completions: CompletionCache,
    ) -> Self {
        Self {
            clock,
            records,
            completions,
            open_sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The cache this tracker marks; share it with the sequencer.
    #[must_use]
    pub fn completions(&self) -> &CompletionCache {
        &self.completions
    }

    /// Persist a progress snapshot for `session_id`, creating the record on
    /// the first call and overwriting it afterwards.
    ///
    /// Completion marking happens before and independent of the storage
    /// attempt: once a snapshot says the game is done, the cache is updated
    /// even if the backend is unreachable.
    ///
    /// Returns `None` on any storage failure; nothing propagates to the
    /// caller and gameplay continues uninterrupted.
    pub async fn update_session(
        &self,
        session_id: SessionId,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
    ) -> Option<SessionRecordRow> {
        if snapshot.is_complete() {
            self.completions.mark_completed(game_type);
        }

        match self.record_id_for(session_id) {
            Some(id) => match self.records.update_record(id, game_type, snapshot).await {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(session = %session_id, game = %game_type, error = %e,
                        "failed to update session record");
                    None
                }
            },
            None => {
                let created_at = self.clock.now();
                match self
                    .records
                    .create_record(game_type, snapshot, created_at)
                    .await
                {
                    Ok(id) => {
                        self.remember(session_id, id);
                        Some(SessionRecordRow::new(
                            id,
                            SessionRecord::from_snapshot(game_type, snapshot, created_at),
                        ))
                    }
                    Err(e) => {
                        warn!(session = %session_id, game = %game_type, error = %e,
                            "failed to create session record");
                        None
                    }
                }
            }
        }
    }

    fn record_id_for(&self, session_id: SessionId) -> Option<RecordId> {
        match self.open_sessions.lock() {
            Ok(guard) => guard.get(&session_id).copied(),
            Err(_) => {
                warn!(session = %session_id, "session table lock poisoned");
                None
            }
        }
    }

    fn remember(&self, session_id: SessionId, id: RecordId) {
        if let Ok(mut guard) = self.open_sessions.lock() {
            guard.insert(session_id, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercise_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn tracker_over(repo: InMemoryRepository) -> SessionTracker {
        let clock = fixed_clock();
        SessionTracker::new(clock, Arc::new(repo), CompletionCache::in_memory(clock))
    }

    fn snapshot(completed: u32, correct: u32) -> ProgressSnapshot {
        ProgressSnapshot::new(completed, 8, correct, correct * 10, completed * 12).unwrap()
    }

    #[tokio::test]
    async fn second_update_reuses_the_record() {
        let repo = InMemoryRepository::new();
        let tracker = tracker_over(repo.clone());
        let session = SessionId::random();

        let first = tracker
            .update_session(session, GameType::Translation, &snapshot(1, 1))
            .await
            .unwrap();
        let second = tracker
            .update_session(session, GameType::Translation, &snapshot(2, 1))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.record_count().unwrap(), 1);
        let stored = repo.get_record(second.id).unwrap();
        assert_eq!(stored.record.snapshot().completed(), 2);
    }

    #[tokio::test]
    async fn distinct_sessions_get_distinct_records() {
        let repo = InMemoryRepository::new();
        let tracker = tracker_over(repo.clone());

        tracker
            .update_session(SessionId::random(), GameType::MathGames, &snapshot(1, 1))
            .await
            .unwrap();
        tracker
            .update_session(SessionId::random(), GameType::MathGames, &snapshot(1, 0))
            .await
            .unwrap();

        assert_eq!(repo.record_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn completion_marks_the_cache_once() {
        let repo = InMemoryRepository::new();
        let tracker = tracker_over(repo);
        let session = SessionId::random();

        tracker
            .update_session(session, GameType::DateCheck, &snapshot(7, 6))
            .await;
        assert!(tracker.completions().completed_today().is_empty());

        tracker
            .update_session(session, GameType::DateCheck, &snapshot(8, 7))
            .await;
        // A late duplicate of the final snapshot is harmless.
        tracker
            .update_session(session, GameType::DateCheck, &snapshot(8, 7))
            .await;

        let completed = tracker.completions().completed_today();
        assert_eq!(completed.len(), 1);
        assert!(completed.contains(&GameType::DateCheck));
    }

    #[tokio::test]
    async fn abandoned_session_leaves_partial_record() {
        let repo = InMemoryRepository::new();
        let tracker = tracker_over(repo.clone());
        let session = SessionId::random();

        let row = tracker
            .update_session(session, GameType::WordPuzzle, &snapshot(3, 2))
            .await
            .unwrap();

        // Player navigates away; no further calls arrive.
        let stored = repo.get_record(row.id).unwrap();
        assert!(!stored.record.snapshot().is_complete());
        assert_eq!(stored.record.snapshot().completed(), 3);
        assert!(tracker.completions().completed_today().is_empty());
    }
}

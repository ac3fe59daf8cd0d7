use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exercise_core::model::{GameType, ProgressSnapshot, RecordId, SessionRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted record together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecordRow {
    pub id: RecordId,
    pub record: SessionRecord,
}

impl SessionRecordRow {
    #[must_use]
    pub fn new(id: RecordId, record: SessionRecord) -> Self {
        Self { id, record }
    }
}

/// Repository contract for session records.
///
/// Updates are full-state overwrites: the engine issues snapshots in event
/// order but does not wait for them, so two in-flight updates may complete
/// out of order. Because every update carries the complete state, the row
/// converges to whichever update arrives last, and the UI always holds the
/// authoritative state locally.
#[async_trait]
pub trait SessionRecordRepository: Send + Sync {
    /// Insert a new record and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or backend failure.
    async fn create_record(
        &self,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StorageError>;

    /// Overwrite an existing record's progress state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record was externally deleted
    /// (non-fatal for callers), or other storage errors.
    async fn update_record(
        &self,
        id: RecordId,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
    ) -> Result<SessionRecordRow, StorageError>;

    /// Fetch records created within the inclusive range, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or backend failure.
    async fn records_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SessionRecordRow>, StorageError>;

    /// Administrative wipe of every record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or backend failure.
    async fn delete_all(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<InMemoryState>>,
}

#[derive(Default)]
struct InMemoryState {
    rows: HashMap<RecordId, SessionRecord>,
    next_id: i64,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn record_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.len())
    }

    /// Fetch a single row by id, mainly for test assertions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if absent.
    pub fn get_record(&self, id: RecordId) -> Result<SessionRecordRow, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .rows
            .get(&id)
            .map(|record| SessionRecordRow::new(id, record.clone()))
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl SessionRecordRepository for InMemoryRepository {
    async fn create_record(
        &self,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = RecordId::new(guard.next_id);
        guard
            .rows
            .insert(id, SessionRecord::from_snapshot(game_type, snapshot, created_at));
        Ok(id)
    }

    async fn update_record(
        &self,
        id: RecordId,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
    ) -> Result<SessionRecordRow, StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let record = guard.rows.get_mut(&id).ok_or(StorageError::NotFound)?;
        if record.game_type() != game_type {
            return Err(StorageError::Conflict);
        }
        record.apply_snapshot(snapshot);
        Ok(SessionRecordRow::new(id, record.clone()))
    }

    async fn records_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SessionRecordRow>, StorageError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<_> = guard
            .rows
            .iter()
            .filter(|(_, r)| r.created_at() >= from && r.created_at() <= until)
            .map(|(id, r)| SessionRecordRow::new(*id, r.clone()))
            .collect();
        rows.sort_by(|a, b| {
            b.record
                .created_at()
                .cmp(&a.record.created_at())
                .then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.rows.clear();
        Ok(())
    }
}

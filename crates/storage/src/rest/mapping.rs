use chrono::{DateTime, Utc};
use exercise_core::model::{GameType, ProgressSnapshot, RecordId, SessionRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::{SessionRecordRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Outgoing column set for inserts and updates.
///
/// `details` mirrors the full progress snapshot so the dashboard can show
/// game-specific extras without schema changes; the flat columns exist for
/// querying and as a fallback if the blob is ever unreadable.
#[derive(Debug, Serialize)]
pub(crate) struct RecordPayload<'a> {
    exercise_type: &'static str,
    score: u32,
    completed: u32,
    total: u32,
    accuracy: Option<u8>,
    is_complete: bool,
    time_seconds: u32,
    mode: Option<&'a str>,
    details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl<'a> RecordPayload<'a> {
    /// Payload for a first insert; `created_at` is written once here.
    pub(crate) fn for_insert(
        game_type: GameType,
        snapshot: &'a ProgressSnapshot,
        created_at: DateTime<Utc>,
    ) -> Result<Self, StorageError> {
        let mut payload = Self::for_update(game_type, snapshot)?;
        payload.created_at = Some(created_at);
        Ok(payload)
    }

    /// Payload for an overwrite; `created_at` is left untouched on the row.
    pub(crate) fn for_update(
        game_type: GameType,
        snapshot: &'a ProgressSnapshot,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            exercise_type: game_type.slug(),
            score: snapshot.score(),
            completed: snapshot.completed(),
            total: snapshot.total(),
            accuracy: snapshot.accuracy(),
            is_complete: snapshot.is_complete(),
            time_seconds: snapshot.elapsed_seconds(),
            mode: snapshot.mode(),
            details: serde_json::to_value(snapshot).map_err(ser)?,
            created_at: None,
        })
    }
}

/// Incoming row shape.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordRow {
    id: i64,
    exercise_type: String,
    score: u32,
    completed: u32,
    total: u32,
    accuracy: Option<u8>,
    is_complete: bool,
    time_seconds: Option<u32>,
    mode: Option<String>,
    details: Option<Value>,
    created_at: DateTime<Utc>,
}

impl RecordRow {
    pub(crate) fn into_row(mut self) -> Result<SessionRecordRow, StorageError> {
        let game_type: GameType = self.exercise_type.parse().map_err(ser)?;

        // Prefer the full snapshot blob; rows written by older clients only
        // have the flat columns, so reconstruct from those when it is absent
        // or unreadable.
        let snapshot = match self
            .details
            .take()
            .and_then(|v| serde_json::from_value::<ProgressSnapshot>(v).ok())
        {
            Some(snapshot) => snapshot,
            None => self.snapshot_from_columns()?,
        };

        Ok(SessionRecordRow::new(
            RecordId::new(self.id),
            SessionRecord::from_snapshot(game_type, &snapshot, self.created_at),
        ))
    }

    fn snapshot_from_columns(&self) -> Result<ProgressSnapshot, StorageError> {
        let correct = self.accuracy.map_or(0, |pct| {
            (f64::from(self.completed) * f64::from(pct) / 100.0).round() as u32
        });
        let mut snapshot = ProgressSnapshot::new(
            self.completed,
            self.total,
            correct,
            self.score,
            self.time_seconds.unwrap_or(0),
        )
        .map_err(ser)?;
        if self.is_complete {
            snapshot = snapshot.finished();
        }
        if let Some(mode) = &self.mode {
            snapshot = snapshot.with_mode(mode.clone());
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exercise_core::time::fixed_now;
    use serde_json::json;

    fn snapshot() -> ProgressSnapshot {
        ProgressSnapshot::new(4, 8, 3, 30, 95)
            .unwrap()
            .with_mode("unscramble")
            .with_detail("hintsUsed", json!(2))
    }

    #[test]
    fn payload_carries_derived_accuracy() {
        let snap = snapshot();
        let payload = RecordPayload::for_insert(GameType::WordPuzzle, &snap, fixed_now()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["exercise_type"], json!("word-puzzle"));
        assert_eq!(value["accuracy"], json!(75));
        assert_eq!(value["is_complete"], json!(false));
        assert_eq!(value["details"]["correct"], json!(3));
        assert_eq!(value["details"]["details"]["hintsUsed"], json!(2));
    }

    #[test]
    fn update_payload_omits_created_at() {
        let snap = snapshot();
        let payload = RecordPayload::for_update(GameType::WordPuzzle, &snap).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn row_roundtrips_through_details_blob() {
        let snap = snapshot();
        let row = RecordRow {
            id: 7,
            exercise_type: "word-puzzle".to_owned(),
            score: snap.score(),
            completed: snap.completed(),
            total: snap.total(),
            accuracy: snap.accuracy(),
            is_complete: snap.is_complete(),
            time_seconds: Some(snap.elapsed_seconds()),
            mode: snap.mode().map(str::to_owned),
            details: Some(serde_json::to_value(&snap).unwrap()),
            created_at: fixed_now(),
        };

        let parsed = row.into_row().unwrap();
        assert_eq!(parsed.id, RecordId::new(7));
        assert_eq!(parsed.record.snapshot(), &snap);
        assert_eq!(parsed.record.created_at(), fixed_now());
    }

    #[test]
    fn row_without_blob_rebuilds_from_columns() {
        let row = RecordRow {
            id: 9,
            exercise_type: "math-games".to_owned(),
            score: 80,
            completed: 10,
            total: 10,
            accuracy: Some(80),
            is_complete: true,
            time_seconds: Some(140),
            mode: Some("addition".to_owned()),
            details: None,
            created_at: fixed_now(),
        };

        let parsed = row.into_row().unwrap();
        let snap = parsed.record.snapshot();
        assert_eq!(snap.correct(), 8);
        assert_eq!(snap.mode(), Some("addition"));
        assert!(snap.is_complete());
    }

    #[test]
    fn unknown_exercise_type_is_a_serialization_error() {
        let row = RecordRow {
            id: 1,
            exercise_type: "chess".to_owned(),
            score: 0,
            completed: 0,
            total: 1,
            accuracy: None,
            is_complete: false,
            time_seconds: None,
            mode: None,
            details: None,
            created_at: fixed_now(),
        };
        assert!(matches!(
            row.into_row().unwrap_err(),
            StorageError::Serialization(_)
        ));
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exercise_core::model::{GameType, ProgressSnapshot, RecordId};
use reqwest::{Response, StatusCode, header::ACCEPT};

use super::RestRepository;
use super::mapping::{RecordPayload, RecordRow, ser};
use crate::repository::{SessionRecordRepository, SessionRecordRow, StorageError};

/// PostgREST media type that unwraps a single-row response.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

fn status_err(resp: &Response) -> Option<StorageError> {
    match resp.status() {
        s if s.is_success() => None,
        // 406 is how PostgREST reports "no row" under the single-object
        // media type; the record was externally deleted.
        StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => Some(StorageError::NotFound),
        StatusCode::CONFLICT => Some(StorageError::Conflict),
        s => Some(StorageError::Connection(format!("http status {s}"))),
    }
}

fn transport<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

async fn parse_single(resp: Response) -> Result<SessionRecordRow, StorageError> {
    if let Some(err) = status_err(&resp) {
        return Err(err);
    }
    let row: RecordRow = resp.json().await.map_err(ser)?;
    row.into_row()
}

#[async_trait]
impl SessionRecordRepository for RestRepository {
    async fn create_record(
        &self,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, StorageError> {
        let payload = RecordPayload::for_insert(game_type, snapshot, created_at)?;
        let resp = self
            .client()
            .post(self.records_url().clone())
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;

        let row = parse_single(resp).await?;
        Ok(row.id)
    }

    async fn update_record(
        &self,
        id: RecordId,
        game_type: GameType,
        snapshot: &ProgressSnapshot,
    ) -> Result<SessionRecordRow, StorageError> {
        let payload = RecordPayload::for_update(game_type, snapshot)?;
        let resp = self
            .client()
            .patch(self.records_url().clone())
            .query(&[("id", format!("eq.{id}"))])
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;

        parse_single(resp).await
    }

    async fn records_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SessionRecordRow>, StorageError> {
        let resp = self
            .client()
            .get(self.records_url().clone())
            .query(&[
                ("select", "*".to_owned()),
                ("created_at", format!("gte.{}", from.to_rfc3339())),
                ("created_at", format!("lte.{}", until.to_rfc3339())),
                ("order", "created_at.desc".to_owned()),
            ])
            .send()
            .await
            .map_err(transport)?;

        if let Some(err) = status_err(&resp) {
            return Err(err);
        }
        let rows: Vec<RecordRow> = resp.json().await.map_err(ser)?;
        rows.into_iter().map(RecordRow::into_row).collect()
    }

    async fn delete_all(&self) -> Result<(), StorageError> {
        // PostgREST refuses an unfiltered DELETE; `id=gt.0` matches all rows.
        let resp = self
            .client()
            .delete(self.records_url().clone())
            .query(&[("id", "gt.0")])
            .send()
            .await
            .map_err(transport)?;

        match status_err(&resp) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

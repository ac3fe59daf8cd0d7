//! Dashboard-side aggregate queries over persisted session records.
//!
//! Read-only: the caregiver dashboard never writes. Failures propagate here,
//! unlike in the tracker, because a dashboard can sensibly offer a retry.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use exercise_core::Clock;
use exercise_core::time::day_bounds;
use storage::repository::{SessionRecordRepository, SessionRecordRow};

use crate::error::StatsError;

/// One calendar day of results, present even when nothing was played.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub results: Vec<SessionRecordRow>,
    pub total_score: u32,
    pub exercise_count: usize,
}

impl DailyStats {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            results: Vec::new(),
            total_score: 0,
            exercise_count: 0,
        }
    }

    fn push(&mut self, row: SessionRecordRow) {
        self.total_score = self.total_score.saturating_add(row.record.snapshot().score());
        self.exercise_count += 1;
        self.results.push(row);
    }
}

/// Aggregation façade over the record store.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    records: Arc<dyn SessionRecordRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, records: Arc<dyn SessionRecordRepository>) -> Self {
        Self { clock, records }
    }

    /// Records created today, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the query fails.
    pub async fn today_results(&self) -> Result<Vec<SessionRecordRow>, StatsError> {
        let (start, end) = day_bounds(self.clock.today());
        Ok(self.records.records_between(start, end).await?)
    }

    /// Records created within the inclusive date range, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the query fails.
    pub async fn results_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SessionRecordRow>, StatsError> {
        let (start, _) = day_bounds(start_date);
        let (_, end) = day_bounds(end_date);
        Ok(self.records.records_between(start, end).await?)
    }

    /// Per-day aggregates for the trailing `days`-day window, today included,
    /// newest first. Days with no play appear with zeroed aggregates so the
    /// dashboard can draw an unbroken timeline.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the query fails.
    pub async fn daily_stats(&self, days: u32) -> Result<Vec<DailyStats>, StatsError> {
        let today = self.clock.today();
        let mut by_date: HashMap<NaiveDate, DailyStats> = HashMap::new();
        let mut window = Vec::with_capacity(days as usize);
        for offset in 0..i64::from(days) {
            if let Some(date) = today.checked_sub_days(chrono::Days::new(offset as u64)) {
                by_date.insert(date, DailyStats::empty(date));
                window.push(date);
            }
        }

        let Some(oldest) = window.last().copied() else {
            return Ok(Vec::new());
        };
        let (start, _) = day_bounds(oldest);
        let (_, end) = day_bounds(today);

        for row in self.records.records_between(start, end).await? {
            let date = row.record.created_at().date_naive();
            if let Some(day) = by_date.get_mut(&date) {
                day.push(row);
            }
        }

        // `window` is already newest-first.
        Ok(window
            .into_iter()
            .filter_map(|date| by_date.remove(&date))
            .collect())
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Free-form per-game payload stored alongside a record for later display.
///
/// Not interpreted by the engine and not subject to any invariant.
pub type Details = serde_json::Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("total must be greater than zero")]
    ZeroTotal,

    #[error("completed ({completed}) exceeds total ({total})")]
    CompletedExceedsTotal { completed: u32, total: u32 },
}

/// A point-in-time view of one game session's progress.
///
/// The game screen rebuilds a full snapshot on every observable change (each
/// answered question, not just at completion) and hands it to the tracker.
/// Fields are absolute values, never deltas, so out-of-order persistence of
/// two snapshots converges to whichever was issued last.
///
/// `score` is expected to be non-decreasing within a session and
/// `elapsed_seconds` is the caller's wall-clock delta since session start;
/// neither is enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    completed: u32,
    total: u32,
    correct: u32,
    score: u32,
    elapsed_seconds: u32,
    is_complete: bool,
    mode: Option<String>,
    #[serde(default)]
    details: Details,
}

impl ProgressSnapshot {
    /// Build a validated snapshot.
    ///
    /// `is_complete` is derived as `completed >= total`; call [`finished`]
    /// for games with an earlier terminal condition.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroTotal` if `total == 0`, or
    /// `ProgressError::CompletedExceedsTotal` if `completed > total`.
    ///
    /// [`finished`]: ProgressSnapshot::finished
    pub fn new(
        completed: u32,
        total: u32,
        correct: u32,
        score: u32,
        elapsed_seconds: u32,
    ) -> Result<Self, ProgressError> {
        if total == 0 {
            return Err(ProgressError::ZeroTotal);
        }
        if completed > total {
            return Err(ProgressError::CompletedExceedsTotal { completed, total });
        }

        Ok(Self {
            completed,
            total,
            correct,
            score,
            elapsed_seconds,
            is_complete: completed >= total,
            mode: None,
            details: Details::new(),
        })
    }

    /// Tag the snapshot with a game-specific mode or difficulty.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Attach a display-only detail value.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Mark the session complete regardless of counts.
    ///
    /// Pattern recall ends on the second miss at whatever level was reached;
    /// other games may have similar terminal conditions short of `total`.
    #[must_use]
    pub fn finished(mut self) -> Self {
        self.is_complete = true;
        self
    }

    #[must_use]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    #[must_use]
    pub fn details(&self) -> &Details {
        &self.details
    }

    /// Percentage of answered questions that were correct.
    ///
    /// Undefined (`None`) while nothing has been answered; otherwise
    /// `round(correct / completed * 100)`, clamped to `[0, 100]`.
    #[must_use]
    pub fn accuracy(&self) -> Option<u8> {
        if self.completed == 0 {
            return None;
        }
        let pct = (f64::from(self.correct) / f64::from(self.completed) * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

#![forbid(unsafe_code)]

pub mod completion;
pub mod drills;
pub mod error;
pub mod sequencer;
pub mod stats;
pub mod tracker;

pub use exercise_core::Clock;

pub use completion::{
    CompletionCache, CompletionStore, InMemoryCompletionStore, JsonFileCompletionStore,
};
pub use error::{CompletionStoreError, StatsError};
pub use sequencer::{DONE_PATH, GameSequencer, NextGame, TodayProgress};
pub use stats::{DailyStats, StatsService};
pub use tracker::SessionTracker;

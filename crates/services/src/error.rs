//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by completion store backends.
///
/// The cache absorbs these (a failed read degrades to an empty set, a failed
/// write is dropped); they exist so store implementations stay honest about
/// what went wrong.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionStoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors emitted by `StatsService`.
///
/// Unlike the tracker, dashboard queries propagate failures so the caller
/// can show a retry affordance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

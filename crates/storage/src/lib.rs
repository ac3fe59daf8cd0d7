#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    InMemoryRepository, SessionRecordRepository, SessionRecordRow, StorageError,
};
pub use rest::{RestInitError, RestRepository};

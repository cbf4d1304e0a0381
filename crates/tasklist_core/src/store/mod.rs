//! Durable storage for the task collection.
//!
//! # Responsibility
//! - Define the storage contract the task service persists through.
//! - Provide the single-file JSON implementation used in production.
//!
//! # Invariants
//! - Every save rewrites the whole collection in one atomic replace.
//! - A document that fails to parse is reported, never repaired.
//! - The store owns no task state between calls.

use crate::model::task::Task;
use std::path::PathBuf;

mod document;
mod json_file;

pub use document::{StoreDocument, SCHEMA_VERSION};
pub use json_file::{ensure_store, load_document, load_tasks, save_tasks, JsonFileStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access task store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("task store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode task store: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Storage contract for the full, ordered task collection.
pub trait TaskStore {
    /// Makes sure a valid (possibly empty) document exists.
    fn ensure(&self) -> StoreResult<()>;
    /// Reads every task in stored order.
    fn load(&self) -> StoreResult<Vec<Task>>;
    /// Replaces the stored collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn ensure(&self) -> StoreResult<()> {
        (**self).ensure()
    }

    fn load(&self) -> StoreResult<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        (**self).save(tasks)
    }
}

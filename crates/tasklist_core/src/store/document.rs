//! Versioned on-disk envelope.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// Version written by this build. Read back but never branched on.
pub const SCHEMA_VERSION: u32 = 1;

/// `{ "version": 1, "tasks": [...] }` as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Borrowed envelope used on the write path.
#[derive(Serialize)]
pub(crate) struct StoreDocumentRef<'a> {
    pub version: u32,
    pub tasks: &'a [Task],
}

impl<'a> StoreDocumentRef<'a> {
    pub(crate) fn current(tasks: &'a [Task]) -> Self {
        Self {
            version: SCHEMA_VERSION,
            tasks,
        }
    }
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record persisted by the store.
//! - Provide value-returning mutations (toggle/rename/priority/due).
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused.
//! - `title` is trimmed and non-empty after every mutation.
//! - `updated_at >= created_at`, and mutations never move `updated_at` back.
//! - Mutations never touch the receiver; they return a new `Task`.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Wire and display format of task timestamps (UTC, whole seconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Opaque task identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = String;

/// Validation failures for task input, the `InvalidArgument` error kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("unknown priority `{0}`; expected low|medium|high")]
    UnknownPriority(String),
    #[error("unknown filter `{0}`; expected all|active|done")]
    UnknownFilter(String),
}

/// Task urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskValidationError::UnknownPriority(value.trim().to_string())),
        }
    }
}

/// One to-do entry.
///
/// Fields are private so the only way to change a task is through the
/// value-returning methods below. Deserialized tasks are trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    done: bool,
    #[serde(with = "timestamp", default = "now_utc")]
    created_at: NaiveDateTime,
    #[serde(with = "timestamp", default = "now_utc")]
    updated_at: NaiveDateTime,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    due: Option<String>,
}

impl Task {
    /// Creates a task through the add path.
    ///
    /// # Contract
    /// - `title` is trimmed; an empty result is rejected.
    /// - A fresh id is generated; `created_at == updated_at`.
    pub fn new(title: &str) -> Result<Self, TaskValidationError> {
        let title = normalize_title(title)?;
        Ok(Self::with_id(new_task_id(), title))
    }

    /// Creates a task with a caller-provided id and default fields.
    ///
    /// Used by import and test paths; the title is stored verbatim.
    pub fn with_id(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        let now = now_utc();
        Self {
            id: id.into(),
            title: title.into(),
            done: false,
            created_at: now,
            updated_at: now,
            priority: Priority::default(),
            due: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due(&self) -> Option<&str> {
        self.due.as_deref()
    }

    /// Returns a copy with `done` flipped.
    #[must_use]
    pub fn toggle(&self) -> Self {
        Self {
            done: !self.done,
            ..self.touched()
        }
    }

    /// Returns a copy with a new trimmed title.
    pub fn rename(&self, new_title: &str) -> Result<Self, TaskValidationError> {
        let title = normalize_title(new_title)?;
        Ok(Self {
            title,
            ..self.touched()
        })
    }

    /// Returns a copy with the given priority.
    #[must_use]
    pub fn set_priority(&self, priority: Priority) -> Self {
        Self {
            priority,
            ..self.touched()
        }
    }

    /// Returns a copy with the due date replaced. Blank input clears it.
    #[must_use]
    pub fn set_due(&self, due: Option<&str>) -> Self {
        let due = due
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            due,
            ..self.touched()
        }
    }

    fn touched(&self) -> Self {
        Self {
            updated_at: now_utc().max(self.updated_at),
            ..self.clone()
        }
    }
}

/// Generates a collision-free task id (32 lowercase hex chars).
pub fn new_task_id() -> TaskId {
    Uuid::new_v4().simple().to_string()
}

fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Current UTC time truncated to whole seconds.
pub(crate) fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// Serde adapter for `YYYY-MM-DDTHH:MM:SS` timestamps.
mod timestamp {
    use super::TIMESTAMP_FORMAT as FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

//! Task use-case service.
//!
//! # Responsibility
//! - Own the in-memory, insertion-ordered task collection.
//! - Provide the CRUD entry points presentation layers call.
//! - Mirror every mutation to the store before returning (write-through).
//!
//! # Invariants
//! - Ids are unique within the collection.
//! - A mutation is applied to a copy, saved, and only then committed; any
//!   failure leaves the collection exactly as it was.
//! - Entries are replaced at their index or removed, never reordered.

use crate::model::filter::TaskFilter;
use crate::model::task::{new_task_id, Priority, Task, TaskId, TaskValidationError};
use crate::store::{StoreError, TaskStore};
use log::{info, warn};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Rejected input (blank title, unknown priority).
    #[error(transparent)]
    InvalidArgument(#[from] TaskValidationError),
    /// No task with this id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Persistence-layer failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse error taxonomy reported across the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    CorruptStore,
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::CorruptStore => "corrupt_store",
            Self::Io => "io",
        }
    }
}

impl TaskServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(StoreError::Corrupt { .. }) => ErrorKind::CorruptStore,
            Self::Store(StoreError::Io { .. } | StoreError::Serialize(_)) => ErrorKind::Io,
        }
    }
}

/// Totals for a list status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub done: usize,
}

/// Write-through task collection over a `TaskStore`.
pub struct TaskService<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskService<S> {
    /// Prepares `store` and loads the collection once.
    ///
    /// A corrupt document fails construction; it is never replaced with an
    /// empty list.
    pub fn open(store: S) -> TaskServiceResult<Self> {
        store.ensure()?;
        let tasks = store.load()?;
        Ok(Self { store, tasks })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read-only snapshot in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Tasks matching `filter`, in insertion order.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let done = self.tasks.iter().filter(|task| task.is_done()).count();
        TaskCounts {
            total: self.tasks.len(),
            active: self.tasks.len() - done,
            done,
        }
    }

    /// Appends a new task with a trimmed title.
    ///
    /// # Contract
    /// - Blank titles fail with `InvalidArgument`; nothing is written.
    /// - The new id differs from every existing id.
    pub fn add(&mut self, title: &str) -> TaskServiceResult<Task> {
        let mut task = Task::new(title)?;
        while self.get(task.id()).is_some() {
            task = Task::with_id(new_task_id(), task.title());
        }

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;
        info!(
            "event=task_add module=service status=ok task_id={} task_count={}",
            task.id(),
            self.tasks.len()
        );
        Ok(task)
    }

    pub fn toggle(&mut self, id: &str) -> TaskServiceResult<Task> {
        self.replace_with(id, "task_toggle", |task| Ok(task.toggle()))
    }

    pub fn rename(&mut self, id: &str, new_title: &str) -> TaskServiceResult<Task> {
        self.replace_with(id, "task_rename", |task| task.rename(new_title))
    }

    pub fn set_priority(&mut self, id: &str, priority: Priority) -> TaskServiceResult<Task> {
        self.replace_with(id, "task_set_priority", |task| {
            Ok(task.set_priority(priority))
        })
    }

    /// Replaces the due date; `None` or a blank string clears it.
    pub fn set_due(&mut self, id: &str, due: Option<&str>) -> TaskServiceResult<Task> {
        self.replace_with(id, "task_set_due", |task| Ok(task.set_due(due)))
    }

    /// Removes one task, keeping the order of the rest.
    pub fn delete(&mut self, id: &str) -> TaskServiceResult<()> {
        let index = self.index_of(id)?;
        let mut next = self.tasks.clone();
        next.remove(index);
        self.commit(next)?;
        info!(
            "event=task_delete module=service status=ok task_id={} task_count={}",
            id,
            self.tasks.len()
        );
        Ok(())
    }

    /// Removes every done task and returns how many were removed.
    pub fn clear_completed(&mut self) -> TaskServiceResult<usize> {
        let next: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| !task.is_done())
            .cloned()
            .collect();
        let removed = self.tasks.len() - next.len();
        self.commit(next)?;
        info!(
            "event=task_clear_completed module=service status=ok removed={} task_count={}",
            removed,
            self.tasks.len()
        );
        Ok(removed)
    }

    fn replace_with(
        &mut self,
        id: &str,
        event: &str,
        apply: impl FnOnce(&Task) -> Result<Task, TaskValidationError>,
    ) -> TaskServiceResult<Task> {
        let index = self.index_of(id)?;
        let updated = apply(&self.tasks[index])?;

        let mut next = self.tasks.clone();
        next[index] = updated.clone();
        self.commit(next)?;
        info!("event={event} module=service status=ok task_id={id}");
        Ok(updated)
    }

    fn index_of(&self, id: &str) -> TaskServiceResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| {
                warn!("event=task_lookup module=service status=error error_code=not_found task_id={id}");
                TaskServiceError::NotFound(id.to_string())
            })
    }

    fn commit(&mut self, next: Vec<Task>) -> TaskServiceResult<()> {
        self.store.save(&next)?;
        self.tasks = next;
        Ok(())
    }
}

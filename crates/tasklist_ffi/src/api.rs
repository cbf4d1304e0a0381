//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task service operations to Dart via FRB.
//! - Flatten domain values into plain strings/flags the UI can render.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call loads the current file, applies one operation and writes it
//!   back before returning; calls inside this process are serialized.
//! - Error kinds are stable strings: `invalid_argument`, `not_found`,
//!   `corrupt_store`, `io`, `config`.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, JsonFileStore,
    Priority, Task, TaskFilter, TaskListConfig, TaskService, TaskServiceError,
    TaskServiceResult, TIMESTAMP_FORMAT,
};

static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();
static SERVICE_LOCK: Mutex<()> = Mutex::new(());

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the task file used by every later call.
///
/// An empty `path` resolves the default location from the environment
/// (`TASKLIST_HOME` / `TASKLIST_PATH`).
///
/// # FFI contract
/// - Idempotent for the same path; a different path after the first call is
///   rejected.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(path: String) -> String {
    let requested = match path.trim() {
        "" => match TaskListConfig::from_env() {
            Ok(config) => config.store_path,
            Err(err) => return err.to_string(),
        },
        trimmed => PathBuf::from(trimmed),
    };

    let active = STORE_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "task store already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// One task flattened for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub done: bool,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC.
    pub created_at: String,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC.
    pub updated_at: String,
    /// `low|medium|high`.
    pub priority: String,
    pub due: Option<String>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Filtered tasks in insertion order.
    pub items: Vec<TaskItem>,
    /// Unfiltered totals for the status line.
    pub total: u32,
    pub active: u32,
    pub done: u32,
    pub error_kind: Option<String>,
    pub message: String,
}

/// Mutation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Task value after the operation (add/toggle/rename/priority/due).
    pub task: Option<TaskItem>,
    /// Number of removed tasks (delete/clear completed).
    pub removed: Option<u32>,
    pub error_kind: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn with_task(message: impl Into<String>, task: &Task) -> Self {
        Self {
            ok: true,
            task: Some(to_task_item(task)),
            removed: None,
            error_kind: None,
            message: message.into(),
        }
    }

    fn with_removed(message: impl Into<String>, removed: usize) -> Self {
        Self {
            ok: true,
            task: None,
            removed: Some(saturating_u32(removed)),
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: ApiError) -> Self {
        Self {
            ok: false,
            task: None,
            removed: None,
            error_kind: Some(err.kind.to_string()),
            message: format!("{operation} failed: {}", err.message),
        }
    }
}

/// Lists tasks through the three-way filter (`all|active|done`, default all).
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list(filter: Option<String>) -> TaskListResponse {
    let result = parse_filter(filter.as_deref()).and_then(|filter| {
        with_task_service(|service| {
            let items = service
                .filtered(filter)
                .into_iter()
                .map(to_task_item)
                .collect::<Vec<_>>();
            Ok((items, service.counts()))
        })
    });

    match result {
        Ok((items, counts)) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
            total: saturating_u32(counts.total),
            active: saturating_u32(counts.active),
            done: saturating_u32(counts.done),
            error_kind: None,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            total: 0,
            active: 0,
            done: 0,
            error_kind: Some(err.kind.to_string()),
            message: format!("task_list failed: {}", err.message),
        },
    }
}

/// Adds a task at the end of the list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String) -> TaskActionResponse {
    match with_task_service(|service| service.add(&title)) {
        Ok(task) => TaskActionResponse::with_task("Task added.", &task),
        Err(err) => TaskActionResponse::failure("task_add", err),
    }
}

/// Flips the completion flag.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> TaskActionResponse {
    match with_task_service(|service| service.toggle(&id)) {
        Ok(task) => TaskActionResponse::with_task("Task updated.", &task),
        Err(err) => TaskActionResponse::failure("task_toggle", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_rename(id: String, title: String) -> TaskActionResponse {
    match with_task_service(|service| service.rename(&id, &title)) {
        Ok(task) => TaskActionResponse::with_task("Task renamed.", &task),
        Err(err) => TaskActionResponse::failure("task_rename", err),
    }
}

/// Sets priority from `low|medium|high` (case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_priority(id: String, priority: String) -> TaskActionResponse {
    let result = parse_priority(&priority)
        .and_then(|priority| with_task_service(|service| service.set_priority(&id, priority)));
    match result {
        Ok(task) => TaskActionResponse::with_task("Priority updated.", &task),
        Err(err) => TaskActionResponse::failure("task_set_priority", err),
    }
}

/// Sets or clears (`None` / blank) the due date.
#[flutter_rust_bridge::frb(sync)]
pub fn task_set_due(id: String, due: Option<String>) -> TaskActionResponse {
    match with_task_service(|service| service.set_due(&id, due.as_deref())) {
        Ok(task) => TaskActionResponse::with_task("Due date updated.", &task),
        Err(err) => TaskActionResponse::failure("task_set_due", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    match with_task_service(|service| service.delete(&id)) {
        Ok(()) => TaskActionResponse::with_removed("Task deleted.", 1),
        Err(err) => TaskActionResponse::failure("task_delete", err),
    }
}

/// Removes every completed task; `removed` carries the count (possibly 0).
#[flutter_rust_bridge::frb(sync)]
pub fn task_clear_completed() -> TaskActionResponse {
    match with_task_service(|service| service.clear_completed()) {
        Ok(removed) => {
            TaskActionResponse::with_removed(format!("Cleared {removed} task(s)."), removed)
        }
        Err(err) => TaskActionResponse::failure("task_clear_completed", err),
    }
}

struct ApiError {
    kind: &'static str,
    message: String,
}

impl From<TaskServiceError> for ApiError {
    fn from(value: TaskServiceError) -> Self {
        Self {
            kind: value.kind().as_str(),
            message: value.to_string(),
        }
    }
}

fn parse_filter(raw: Option<&str>) -> Result<TaskFilter, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(TaskFilter::All),
        Some(value) => value
            .parse::<TaskFilter>()
            .map_err(|err| ApiError::from(TaskServiceError::from(err))),
    }
}

fn parse_priority(raw: &str) -> Result<Priority, ApiError> {
    raw.parse::<Priority>()
        .map_err(|err| ApiError::from(TaskServiceError::from(err)))
}

fn resolve_store_path() -> Result<PathBuf, ApiError> {
    if let Some(path) = STORE_PATH.get() {
        return Ok(path.clone());
    }
    let config = TaskListConfig::from_env().map_err(|err| ApiError {
        kind: "config",
        message: err.to_string(),
    })?;
    Ok(STORE_PATH.get_or_init(|| config.store_path).clone())
}

fn with_task_service<T>(
    f: impl FnOnce(&mut TaskService<JsonFileStore>) -> TaskServiceResult<T>,
) -> Result<T, ApiError> {
    let _guard = SERVICE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let path = resolve_store_path()?;
    let mut service = TaskService::open(JsonFileStore::new(path)).map_err(|err| {
        warn!(
            "event=ffi_open module=ffi status=error error_code={}",
            err.kind().as_str()
        );
        ApiError::from(err)
    })?;
    f(&mut service).map_err(ApiError::from)
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id().to_string(),
        title: task.title().to_string(),
        done: task.is_done(),
        created_at: task.created_at().format(TIMESTAMP_FORMAT).to_string(),
        updated_at: task.updated_at().format(TIMESTAMP_FORMAT).to_string(),
        priority: task.priority().to_string(),
        due: task.due().map(str::to_string),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

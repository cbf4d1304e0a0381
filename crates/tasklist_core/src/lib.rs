//! Core domain logic for the task list.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, TaskListConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::TaskFilter;
pub use model::task::{Priority, Task, TaskId, TaskValidationError, TIMESTAMP_FORMAT};
pub use service::task_service::{
    ErrorKind, TaskCounts, TaskService, TaskServiceError, TaskServiceResult,
};
pub use store::{JsonFileStore, StoreDocument, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

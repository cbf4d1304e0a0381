//! Task list domain model.
//!
//! # Responsibility
//! - Define the task record and its value-returning mutations.
//! - Define the list filter shared by every presentation layer.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Tasks are immutable values; collections replace entries instead of
//!   mutating them.

pub mod filter;
pub mod task;

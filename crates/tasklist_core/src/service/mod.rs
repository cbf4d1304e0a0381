//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and store writes into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_service;

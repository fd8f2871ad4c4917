//! Core use-case services.
//!
//! # Responsibility
//! - Own the task collection and its persistence lifecycle.
//! - Keep UI callers decoupled from storage details.

pub mod snapshot;
pub mod task_store;

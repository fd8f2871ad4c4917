//! Core domain logic for Taskdeck.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    Attachment, AttachmentId, NewAttachment, NewTask, Note, NoteId, Quadrant, RecordId, Task,
    TaskId, TaskPatch, TaskPriority, TaskStatus, TaskValidationError,
};
pub use repo::slot_repo::{
    MemorySlotRepository, SlotRepository, SqliteSlotRepository, StorageError, StorageResult,
};
pub use service::snapshot::{decode_tasks, encode_tasks};
pub use service::task_store::{
    StoreError, StoreErrorKind, StoreResult, TaskStore, DEFAULT_SLOT_KEY,
};
pub use view::filter::{filter_tasks, sort_tasks, TaskFilter, TaskOrder};
pub use view::matrix::{partition_by_quadrant, partition_open_by_quadrant, QuadrantPartition};
pub use view::stats::{
    summarize, CompletionTime, DashboardStats, PriorityCounts, QuadrantCounts, StatusCounts,
};

/// Minimal health-check API for embedding runtimes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

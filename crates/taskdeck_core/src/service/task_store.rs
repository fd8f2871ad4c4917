//! Task store: sole owner of the task collection.
//!
//! # Responsibility
//! - Provide create/read/update/delete plus note/attachment helpers.
//! - Keep the durable slot in sync with the in-memory collection.
//!
//! # Invariants
//! - All operations on one store are serialized by a single lock.
//! - A mutation is applied to a working copy; the cached collection is
//!   replaced only after the slot write succeeds. Failed calls leave both
//!   the cache and the slot untouched.
//! - A corrupt slot loads as an empty collection and is overwritten by the
//!   next successful mutation.
//! - A slot read that fails is never cached: reads see an empty collection
//!   and retry on the next call, and mutations fail with `Storage` instead
//!   of writing over data that could not be read.
//! - `completed_at` is set iff `status == Completed` after every update.

use crate::model::task::{
    validate_note_content, validate_title, Attachment, AttachmentId, NewAttachment, NewTask,
    Note, NoteId, Task, TaskId, TaskPatch, TaskStatus, TaskValidationError,
};
use crate::repo::slot_repo::{SlotRepository, SqliteSlotRepository, StorageError, StorageResult};
use crate::service::snapshot::{decode_tasks, encode_tasks};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Slot key used when the caller does not pick one.
pub const DEFAULT_SLOT_KEY: &str = "todo-app-tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    AttachmentNotFound {
        task_id: TaskId,
        attachment_id: AttachmentId,
    },
    /// The slot could not be read or written; the mutation was not applied.
    Storage(StorageError),
}

/// Coarse error classes callers route on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Validation(_) => StoreErrorKind::Validation,
            Self::TaskNotFound(_) | Self::AttachmentNotFound { .. } => StoreErrorKind::NotFound,
            Self::Storage(_) => StoreErrorKind::Storage,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::AttachmentNotFound {
                task_id,
                attachment_id,
            } => write!(f, "attachment {attachment_id} not found on task {task_id}"),
            Self::Storage(err) => write!(f, "changes were not saved: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::TaskNotFound(_) | Self::AttachmentNotFound { .. } => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

struct StoreState<R> {
    repo: R,
    /// `None` until the slot has been read once.
    tasks: Option<Vec<Task>>,
}

impl<R: SlotRepository> StoreState<R> {
    /// Cached collection, reading the slot first if needed. A read error
    /// leaves the cache empty so the next call tries again.
    fn loaded(&mut self, slot_key: &str) -> StorageResult<&mut Vec<Task>> {
        let tasks = match self.tasks.take() {
            Some(tasks) => tasks,
            None => load_tasks(&self.repo, slot_key)?,
        };
        Ok(self.tasks.insert(tasks))
    }
}

/// Task store over a durable slot.
///
/// `TaskStore<R>` is `Send + Sync` whenever `R: Send`, so it can be shared
/// behind an `Arc` by a UI runtime.
pub struct TaskStore<R: SlotRepository> {
    slot_key: String,
    state: Mutex<StoreState<R>>,
}

impl TaskStore<SqliteSlotRepository> {
    /// Opens a store over a SQLite file using the default slot key.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(SqliteSlotRepository::open(path)?))
    }
}

impl<R: SlotRepository> TaskStore<R> {
    pub fn new(repo: R) -> Self {
        Self::with_slot_key(repo, DEFAULT_SLOT_KEY)
    }

    pub fn with_slot_key(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            slot_key: slot_key.into(),
            state: Mutex::new(StoreState { repo, tasks: None }),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Returns a snapshot of every task in insertion order.
    ///
    /// Never fails; unreadable storage yields an empty list.
    pub fn list(&self) -> Vec<Task> {
        self.lock()
            .loaded(&self.slot_key)
            .map(|tasks| tasks.clone())
            .unwrap_or_default()
    }

    /// Point lookup. `None` means not found.
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.lock()
            .loaded(&self.slot_key)
            .ok()
            .and_then(|tasks| tasks.iter().find(|task| &task.id == id).cloned())
    }

    /// Creates and persists a task.
    ///
    /// # Errors
    /// - `Validation` when the title is blank.
    /// - `Storage` when the slot cannot be read or written.
    ///
    /// A `Completed` status is stored as given, but `completed_at` stays
    /// `None` until a later update stamps it.
    pub fn create(&self, fields: NewTask) -> StoreResult<Task> {
        validate_title(&fields.title)?;
        let task = Task::new(fields, Utc::now());
        let task_id = task.id.clone();

        self.commit("task_create", &task_id, move |tasks| {
            tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Merges `patch` onto an existing task and persists it.
    ///
    /// # Contract
    /// - Unspecified fields are retained.
    /// - Moving to `Completed` stamps `completed_at` if unset; any other
    ///   status clears it.
    /// - `updated_at` is refreshed even when nothing else changed.
    pub fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.commit("task_update", id, |tasks| {
            apply_patch(tasks, id, patch, Utc::now())
        })
    }

    /// Removes a task together with its notes and attachments.
    pub fn delete(&self, id: &TaskId) -> StoreResult<()> {
        self.commit("task_delete", id, |tasks| {
            let index = position(tasks, id)?;
            tasks.remove(index);
            Ok(())
        })
    }

    /// Appends a note authored by `author`.
    ///
    /// # Errors
    /// - `Validation` when `content` is blank.
    /// - `TaskNotFound` when `task_id` is unknown.
    pub fn append_note(
        &self,
        task_id: &TaskId,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> StoreResult<Task> {
        let content = content.into();
        validate_note_content(&content)?;
        let author = author.into();

        self.commit("note_append", task_id, |tasks| {
            let now = Utc::now();
            let mut notes = tasks[position(tasks, task_id)?].notes.clone();
            notes.push(Note {
                id: NoteId::generate(),
                content,
                created_at: now,
                created_by: author,
            });
            let patch = TaskPatch {
                notes: Some(notes),
                ..TaskPatch::default()
            };
            apply_patch(tasks, task_id, patch, now)
        })
    }

    /// Records attachment metadata on a task.
    pub fn add_attachment(&self, task_id: &TaskId, metadata: NewAttachment) -> StoreResult<Task> {
        self.commit("attachment_add", task_id, |tasks| {
            let now = Utc::now();
            let mut attachments = tasks[position(tasks, task_id)?].attachments.clone();
            attachments.push(Attachment {
                id: AttachmentId::generate(),
                name: metadata.name,
                url: metadata.url,
                mime_type: metadata.mime_type,
                size: metadata.size,
                uploaded_at: now,
                uploaded_by: metadata.uploaded_by,
            });
            let patch = TaskPatch {
                attachments: Some(attachments),
                ..TaskPatch::default()
            };
            apply_patch(tasks, task_id, patch, now)
        })
    }

    /// Removes one attachment by ID.
    ///
    /// # Errors
    /// - `TaskNotFound` / `AttachmentNotFound` for unknown IDs.
    pub fn remove_attachment(
        &self,
        task_id: &TaskId,
        attachment_id: &AttachmentId,
    ) -> StoreResult<Task> {
        self.commit("attachment_remove", task_id, |tasks| {
            let mut attachments = tasks[position(tasks, task_id)?].attachments.clone();
            let index = attachments
                .iter()
                .position(|attachment| &attachment.id == attachment_id)
                .ok_or_else(|| StoreError::AttachmentNotFound {
                    task_id: task_id.clone(),
                    attachment_id: attachment_id.clone(),
                })?;
            attachments.remove(index);
            let patch = TaskPatch {
                attachments: Some(attachments),
                ..TaskPatch::default()
            };
            apply_patch(tasks, task_id, patch, Utc::now())
        })
    }

    /// Drops the cached collection; the next call re-reads the slot.
    pub fn reload(&self) {
        self.lock().tasks = None;
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<R>> {
        // A panic mid-commit never leaves a half-applied cache, so the
        // poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit<T>(
        &self,
        event: &'static str,
        task_id: &TaskId,
        mutate: impl FnOnce(&mut Vec<Task>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;

        let mut working = match state.loaded(&self.slot_key) {
            Ok(tasks) => tasks.clone(),
            Err(err) => {
                error!(
                    "event={event} module=store status=error task_id={task_id} duration_ms={} error_code=slot_read_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };
        let output = mutate(&mut working).map_err(|err| {
            warn!(
                "event={event} module=store status=rejected task_id={task_id} error_kind={:?}",
                err.kind()
            );
            err
        })?;

        let persisted = encode_tasks(&working)
            .map_err(StorageError::from)
            .and_then(|blob| state.repo.write_slot(&self.slot_key, &blob));
        if let Err(err) = persisted {
            error!(
                "event={event} module=store status=error task_id={task_id} duration_ms={} error_code=slot_write_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }

        state.tasks = Some(working);
        info!(
            "event={event} module=store status=ok task_id={task_id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(output)
    }
}

fn position(tasks: &[Task], id: &TaskId) -> StoreResult<usize> {
    tasks
        .iter()
        .position(|task| &task.id == id)
        .ok_or_else(|| StoreError::TaskNotFound(id.clone()))
}

fn apply_patch(
    tasks: &mut [Task],
    id: &TaskId,
    patch: TaskPatch,
    now: DateTime<Utc>,
) -> StoreResult<Task> {
    let index = position(tasks, id)?;
    let mut task = tasks[index].clone();

    patch.apply_to(&mut task);
    task.validate()?;

    if task.status == TaskStatus::Completed {
        task.completed_at.get_or_insert(now);
    } else {
        task.completed_at = None;
    }
    task.updated_at = now.max(task.updated_at);

    tasks[index] = task.clone();
    Ok(task)
}

fn load_tasks<R: SlotRepository>(repo: &R, slot_key: &str) -> StorageResult<Vec<Task>> {
    let blob = match repo.read_slot(slot_key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!("event=store_load module=store status=empty slot_key={slot_key}");
            return Ok(Vec::new());
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=degraded slot_key={slot_key} error_code=slot_read_failed error={err}"
            );
            return Err(err);
        }
    };

    match decode_tasks(&blob) {
        Ok(tasks) => {
            info!(
                "event=store_load module=store status=ok slot_key={slot_key} task_count={}",
                tasks.len()
            );
            Ok(tasks)
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=degraded slot_key={slot_key} error_code=slot_corrupt blob_bytes={} error={err}",
                blob.len()
            );
            Ok(Vec::new())
        }
    }
}

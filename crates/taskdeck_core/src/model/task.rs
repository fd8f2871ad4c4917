//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the durable slot.
//! - Define the create/patch input shapes accepted at the store boundary.
//! - Classify tasks into urgency/importance quadrants.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `completed_at` is set iff `status == Completed` after any store update.
//! - `updated_at >= created_at`.
//! - Notes and attachments are owned by exactly one task.
//!
//! # See also
//! - `service::task_store` for the mutation rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque string identifier for tasks, notes and attachments.
///
/// Fresh records get a UUID v4. Older blobs carry millisecond timestamps
/// (`"1712345678901"`), so decoding accepts any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

pub type TaskId = RecordId;
pub type NoteId = RecordId;
pub type AttachmentId = RecordId;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started. Older blobs spell this `todo`.
    #[default]
    #[serde(alias = "todo")]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Finished; `completed_at` carries the transition time.
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire spelling, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Sort weight, higher is more pressing.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

/// Eisenhower matrix cell derived from `(is_urgent, is_important)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Urgent and important.
    DoFirst,
    /// Important, not urgent.
    Schedule,
    /// Urgent, not important.
    Delegate,
    /// Neither.
    Eliminate,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Self::DoFirst,
        Self::Schedule,
        Self::Delegate,
        Self::Eliminate,
    ];

    pub fn classify(is_urgent: bool, is_important: bool) -> Self {
        match (is_urgent, is_important) {
            (true, true) => Self::DoFirst,
            (false, true) => Self::Schedule,
            (true, false) => Self::Delegate,
            (false, false) => Self::Eliminate,
        }
    }

    /// Human-readable matrix label.
    pub fn label(self) -> &'static str {
        match self {
            Self::DoFirst => "Do First",
            Self::Schedule => "Schedule",
            Self::Delegate => "Delegate",
            Self::Eliminate => "Eliminate",
        }
    }
}

/// Append-only comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// File metadata attached to a task. Bytes live in an external store; `url`
/// is an opaque reference into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub url: String,
    /// Serialized as `type` to match the stored schema.
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
}

/// Attachment metadata supplied by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size: u64,
    pub uploaded_by: Option<String>,
}

/// Canonical task record.
///
/// Everything except identity and the two lifecycle timestamps has a serde
/// default, so blobs written by older schemas still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub services: BTreeSet<String>,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub task_owner: String,
    #[serde(default)]
    pub collaborator: String,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a fresh record with a generated ID.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now`.
    /// - `completed_at` starts as `None`; only updates move it.
    /// - Notes and attachments start empty.
    pub fn new(fields: NewTask, now: DateTime<Utc>) -> Self {
        Self::with_id(TaskId::generate(), fields, now)
    }

    /// Builds a fresh record with a caller-provided ID.
    pub fn with_id(id: TaskId, fields: NewTask, now: DateTime<Utc>) -> Self {
        let NewTask {
            title,
            description,
            status,
            priority,
            due_date,
            department,
            services,
            zone,
            site_name,
            city,
            task_owner,
            collaborator,
            is_urgent,
            is_important,
            category,
        } = fields;

        Self {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            department,
            services,
            zone,
            site_name,
            city,
            task_owner,
            collaborator,
            is_urgent,
            is_important,
            category,
            notes: Vec::new(),
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.is_urgent, self.is_important)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Checks store-boundary contracts on this record.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }
}

/// Create input. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub department: String,
    pub services: BTreeSet<String>,
    pub zone: String,
    pub site_name: String,
    pub city: String,
    pub task_owner: String,
    pub collaborator: String,
    pub is_urgent: bool,
    pub is_important: bool,
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub department: Option<String>,
    pub services: Option<BTreeSet<String>>,
    pub zone: Option<String>,
    pub site_name: Option<String>,
    pub city: Option<String>,
    pub task_owner: Option<String>,
    pub collaborator: Option<String>,
    pub is_urgent: Option<bool>,
    pub is_important: Option<bool>,
    pub category: Option<String>,
    /// Replaces the whole note sequence.
    pub notes: Option<Vec<Note>>,
    /// Replaces the whole attachment sequence.
    pub attachments: Option<Vec<Attachment>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Shallow merge onto `task`. Lifecycle timestamps are the caller's job.
    pub fn apply_to(self, task: &mut Task) {
        let Self {
            title,
            description,
            status,
            priority,
            due_date,
            department,
            services,
            zone,
            site_name,
            city,
            task_owner,
            collaborator,
            is_urgent,
            is_important,
            category,
            notes,
            attachments,
        } = self;

        replace(&mut task.title, title);
        replace(&mut task.description, description);
        replace(&mut task.status, status);
        replace(&mut task.priority, priority);
        replace(&mut task.due_date, due_date);
        replace(&mut task.department, department);
        replace(&mut task.services, services);
        replace(&mut task.zone, zone);
        replace(&mut task.site_name, site_name);
        replace(&mut task.city, city);
        replace(&mut task.task_owner, task_owner);
        replace(&mut task.collaborator, collaborator);
        replace(&mut task.is_urgent, is_urgent);
        replace(&mut task.is_important, is_important);
        replace(&mut task.category, category);
        replace(&mut task.notes, notes);
        replace(&mut task.attachments, attachments);
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Contract violations rejected at the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    EmptyNoteContent,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::EmptyNoteContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

pub(crate) fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

pub(crate) fn validate_note_content(content: &str) -> Result<(), TaskValidationError> {
    if content.trim().is_empty() {
        return Err(TaskValidationError::EmptyNoteContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Quadrant, RecordId, Task, TaskPatch, TaskStatus, TaskValidationError};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn classify_covers_all_four_cells() {
        assert_eq!(Quadrant::classify(true, true), Quadrant::DoFirst);
        assert_eq!(Quadrant::classify(false, true), Quadrant::Schedule);
        assert_eq!(Quadrant::classify(true, false), Quadrant::Delegate);
        assert_eq!(Quadrant::classify(false, false), Quadrant::Eliminate);
    }

    #[test]
    fn patch_replaces_only_specified_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut task = Task::new(
            NewTask {
                description: "keep me".to_string(),
                due_date: NaiveDate::from_ymd_opt(2026, 3, 5),
                ..NewTask::new("draft")
            },
            now,
        );

        TaskPatch {
            title: Some("final".to_string()),
            is_urgent: Some(true),
            ..TaskPatch::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.title, "final");
        assert!(task.is_urgent);
        assert_eq!(task.description, "keep me");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 3, 5));

        TaskPatch {
            due_date: Some(None),
            ..TaskPatch::default()
        }
        .apply_to(&mut task);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn validate_rejects_whitespace_title() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let task = Task::new(NewTask::new("   "), now);
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn generated_ids_are_uuid_strings() {
        let id = RecordId::generate();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, RecordId::generate());
    }

    #[test]
    fn record_id_serializes_as_bare_string() {
        let id = RecordId::from("1712345678901");
        assert_eq!(serde_json::to_value(&id).unwrap(), "1712345678901");
        let back: RecordId = serde_json::from_str("\"1712345678901\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn status_wire_names_match_serde() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }
}

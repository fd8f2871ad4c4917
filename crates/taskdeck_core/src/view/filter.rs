//! List-view filtering and ordering.
//!
//! # Invariants
//! - Filters are a conjunction; an unset filter matches everything.
//! - Output preserves input order unless `sort_tasks` is applied.

use crate::model::task::{Task, TaskPriority, TaskStatus};
use std::cmp::{Ordering, Reverse};

/// Predicate set for the task list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact department match.
    pub department: Option<String>,
    /// Matches tasks whose service set contains this value.
    pub service: Option<String>,
    /// Case-insensitive substring over title, description, collaborator
    /// and task owner. Blank text is ignored.
    pub search_text: Option<String>,
}

impl TaskFilter {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self
                .category
                .as_deref()
                .map_or(true, |category| task.category == category)
            && self
                .department
                .as_deref()
                .map_or(true, |department| task.department == department)
            && self
                .service
                .as_deref()
                .map_or(true, |service| task.services.contains(service))
            && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        let Some(needle) = self.search_text.as_deref().map(str::trim) else {
            return true;
        };
        if needle.is_empty() {
            return true;
        }

        let needle = needle.to_lowercase();
        [
            task.title.as_str(),
            task.description.as_str(),
            task.collaborator.as_str(),
            task.task_owner.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Returns the tasks matching `filter`, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Orderings offered by the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskOrder {
    /// Keep store order.
    #[default]
    Insertion,
    /// Earliest due date first; undated tasks last.
    DueDate,
    /// High priority first.
    Priority,
    /// Most recently created first.
    Newest,
    /// Most recently updated first.
    RecentlyUpdated,
    /// Case-insensitive title.
    Title,
}

/// Stable sort; ties keep their relative order.
pub fn sort_tasks(tasks: &mut [&Task], order: TaskOrder) {
    match order {
        TaskOrder::Insertion => {}
        TaskOrder::DueDate => tasks.sort_by(|a, b| compare_due(a, b)),
        TaskOrder::Priority => tasks.sort_by_key(|task| Reverse(task.priority.rank())),
        TaskOrder::Newest => tasks.sort_by_key(|task| Reverse(task.created_at)),
        TaskOrder::RecentlyUpdated => tasks.sort_by_key(|task| Reverse(task.updated_at)),
        TaskOrder::Title => tasks.sort_by_cached_key(|task| task.title.to_lowercase()),
    }
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

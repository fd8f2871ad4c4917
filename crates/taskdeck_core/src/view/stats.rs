//! Dashboard statistics.
//!
//! # Invariants
//! - `completion_days` only lists completed tasks with a completion stamp.
//! - Counts do not depend on whether timestamps are present.

use crate::model::task::{Quadrant, Task, TaskId, TaskPriority, TaskStatus};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantCounts {
    pub do_first: usize,
    pub schedule: usize,
    pub delegate: usize,
    pub eliminate: usize,
}

impl QuadrantCounts {
    pub fn get(&self, quadrant: Quadrant) -> usize {
        match quadrant {
            Quadrant::DoFirst => self.do_first,
            Quadrant::Schedule => self.schedule,
            Quadrant::Delegate => self.delegate,
            Quadrant::Eliminate => self.eliminate,
        }
    }
}

/// Whole days between creation and completion of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionTime {
    pub task_id: TaskId,
    pub title: String,
    pub days: i64,
}

/// Aggregates rendered by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub by_quadrant: QuadrantCounts,
    pub completion_days: Vec<CompletionTime>,
}

impl DashboardStats {
    /// Completed share of all tasks, rounded to a whole percent.
    pub fn completion_rate_percent(&self) -> u32 {
        rounded_percent(self.by_status.completed, self.total)
    }

    /// High-priority share of all tasks, rounded to a whole percent.
    pub fn high_priority_percent(&self) -> u32 {
        rounded_percent(self.by_priority.high, self.total)
    }

    pub fn average_completion_days(&self) -> Option<f64> {
        if self.completion_days.is_empty() {
            return None;
        }
        let sum: i64 = self.completion_days.iter().map(|entry| entry.days).sum();
        Some(sum as f64 / self.completion_days.len() as f64)
    }
}

/// Computes dashboard aggregates in one pass.
pub fn summarize(tasks: &[Task]) -> DashboardStats {
    let mut stats = DashboardStats {
        total: tasks.len(),
        ..DashboardStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.by_status.pending += 1,
            TaskStatus::InProgress => stats.by_status.in_progress += 1,
            TaskStatus::Completed => stats.by_status.completed += 1,
        }
        match task.priority {
            TaskPriority::Low => stats.by_priority.low += 1,
            TaskPriority::Medium => stats.by_priority.medium += 1,
            TaskPriority::High => stats.by_priority.high += 1,
        }
        match task.quadrant() {
            Quadrant::DoFirst => stats.by_quadrant.do_first += 1,
            Quadrant::Schedule => stats.by_quadrant.schedule += 1,
            Quadrant::Delegate => stats.by_quadrant.delegate += 1,
            Quadrant::Eliminate => stats.by_quadrant.eliminate += 1,
        }

        if task.is_completed() {
            if let Some(completed_at) = task.completed_at {
                let elapsed_ms = (completed_at - task.created_at).num_milliseconds();
                stats.completion_days.push(CompletionTime {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                    days: ceil_days(elapsed_ms),
                });
            }
        }
    }

    stats
}

fn ceil_days(elapsed_ms: i64) -> i64 {
    // Integer division truncates toward zero, which is already the ceiling
    // for negative spans.
    let days = elapsed_ms / MILLIS_PER_DAY;
    if elapsed_ms % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

//! Urgency/importance matrix projection.

use crate::model::task::{Quadrant, Task};

/// Tasks grouped by matrix cell, each group in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadrantPartition<'a> {
    pub do_first: Vec<&'a Task>,
    pub schedule: Vec<&'a Task>,
    pub delegate: Vec<&'a Task>,
    pub eliminate: Vec<&'a Task>,
}

impl<'a> QuadrantPartition<'a> {
    pub fn get(&self, quadrant: Quadrant) -> &[&'a Task] {
        match quadrant {
            Quadrant::DoFirst => &self.do_first,
            Quadrant::Schedule => &self.schedule,
            Quadrant::Delegate => &self.delegate,
            Quadrant::Eliminate => &self.eliminate,
        }
    }

    pub fn len(&self) -> usize {
        Quadrant::ALL.iter().map(|q| self.get(*q).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, task: &'a Task) {
        match task.quadrant() {
            Quadrant::DoFirst => self.do_first.push(task),
            Quadrant::Schedule => self.schedule.push(task),
            Quadrant::Delegate => self.delegate.push(task),
            Quadrant::Eliminate => self.eliminate.push(task),
        }
    }
}

/// Splits `tasks` into the four matrix cells.
///
/// Status is not inspected; the matrix view passes open tasks only (see
/// `partition_open_by_quadrant`).
pub fn partition_by_quadrant(tasks: &[Task]) -> QuadrantPartition<'_> {
    let mut partition = QuadrantPartition::default();
    for task in tasks {
        partition.push(task);
    }
    partition
}

/// Matrix view input: completed tasks are left out.
pub fn partition_open_by_quadrant(tasks: &[Task]) -> QuadrantPartition<'_> {
    let mut partition = QuadrantPartition::default();
    for task in tasks.iter().filter(|task| !task.is_completed()) {
        partition.push(task);
    }
    partition
}

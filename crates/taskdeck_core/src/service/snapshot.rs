//! Task collection blob codec.
//!
//! The durable slot holds the entire collection as one JSON array of task
//! records with ISO-8601 dates and inline notes/attachments.

use crate::model::task::{Task, TaskId};
use log::warn;
use serde_json::Value;
use std::collections::HashSet;

/// Serializes the full collection into a slot blob.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

/// Parses a slot blob back into a collection.
///
/// The blob must be a JSON array. A record that does not decode as a task is
/// dropped on its own instead of failing the whole array. Records repeating
/// an earlier ID are dropped too; the first occurrence wins.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(blob)?;
    let total = records.len();

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(total);
    let mut tasks = Vec::with_capacity(total);
    let mut malformed = 0_usize;
    let mut duplicates = 0_usize;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Task>(record) {
            Ok(task) if seen.insert(task.id.clone()) => tasks.push(task),
            Ok(_) => duplicates += 1,
            Err(err) => {
                malformed += 1;
                warn!(
                    "event=snapshot_decode module=store status=degraded record_index={index} error={err}"
                );
            }
        }
    }

    if malformed + duplicates > 0 {
        warn!(
            "event=snapshot_decode module=store status=degraded records_total={total} malformed_dropped={malformed} duplicates_dropped={duplicates}"
        );
    }
    Ok(tasks)
}

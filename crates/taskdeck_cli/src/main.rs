//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskdeck_core` linkage without a UI runtime.
//! - With a database path argument, open the durable store and print the
//!   dashboard summary as stable `key=value` lines.
//!
//! Environment:
//! - `TASKDECK_LOG_DIR`: absolute directory for rolling logs (optional).

use std::process::ExitCode;

use taskdeck_core::{
    default_log_level, init_logging, partition_open_by_quadrant, summarize, Quadrant, TaskStatus,
    TaskStore,
};

const LOG_DIR_ENV: &str = "TASKDECK_LOG_DIR";

fn main() -> ExitCode {
    println!("taskdeck_core ping={}", taskdeck_core::ping());
    println!("taskdeck_core version={}", taskdeck_core::core_version());

    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = std::env::args_os().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match TaskStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open task database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let tasks = store.list();
    let stats = summarize(&tasks);
    println!("tasks.total={}", stats.total);
    for status in TaskStatus::ALL {
        println!("tasks.status.{}={}", status.as_str(), stats.by_status.get(status));
    }
    println!("tasks.completion_rate_percent={}", stats.completion_rate_percent());
    println!("tasks.high_priority_percent={}", stats.high_priority_percent());
    if let Some(days) = stats.average_completion_days() {
        println!("tasks.average_completion_days={days:.1}");
    }

    let matrix = partition_open_by_quadrant(&tasks);
    for quadrant in Quadrant::ALL {
        println!(
            "matrix.{}={}",
            quadrant.label().to_lowercase().replace(' ', "_"),
            matrix.get(quadrant).len()
        );
    }

    ExitCode::SUCCESS
}

//! Pieces every backend shares: detached thread launch and the busy-poll sleep.

use std::thread;

use osal_types::{DEFAULT_PROCESS_NAME, OsalError};

use crate::Task;

/// Start `task` on a detached OS thread named after the process.
///
/// The join handle is dropped immediately, so the caller never observes completion.
/// Interior NULs are dropped from the thread name; the log line keeps the name as given.
pub fn spawn_detached(name: Option<&str>, task: Task) -> Result<(), OsalError> {
    let name = name.unwrap_or(DEFAULT_PROCESS_NAME);
    tracing::info!(process = name, "Running process {name}");

    thread::Builder::new()
        .name(thread_name(name))
        .spawn(task)
        .map(drop)
        .map_err(|source| {
            tracing::warn!(process = name, "Failed to spawn process: {source}");
            OsalError::Spawn {
                name: name.to_string(),
                source,
            }
        })
}

// std panics on a thread name containing NUL.
fn thread_name(name: &str) -> String {
    name.replace('\0', "")
}

/// Spin on `now_ms` until `ms` milliseconds have elapsed.
///
/// Uses wrapping arithmetic so a clock rollover mid-sleep does not end it early.
pub fn busy_poll_sleep(now_ms: impl Fn() -> u32, ms: u32) {
    let start = now_ms();
    while now_ms().wrapping_sub(start) < ms {
        std::hint::spin_loop();
    }
}

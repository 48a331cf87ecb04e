//! Platform-neutral interface of the OS abstraction layer.
//!
//! # Architecture
//!
//! ```text
//! application -> LinuxPlatform | PortablePlatform  (picked at build time)
//!                      |
//!                      v
//!        Platform: now_ms, sleep, allocate/free, spawn_task
//!                  create_mutex     -> TimedMutex:      wait(ms) / signal()
//!                  create_semaphore -> BinarySemaphore: wait(ms) / signal()
//! ```
//!
//! There is no orchestration layer and no runtime discovery. Each backend crate
//! implements [`Platform`]; the consumer constructs one and calls it directly.
//!
//! Timeouts come back as `false`, exhaustion as `None` or [`OsalError`], and a broken
//! lock primitive as [`Fatal`], which the application hands to [`escalate`].

mod fatal;
mod heap;
mod launch;
mod platform;

pub use fatal::{EscalateExt, escalate, raise};
pub use heap::HeapBlock;
pub use launch::{busy_poll_sleep, spawn_detached};
pub use platform::{BinarySemaphore, Platform, Task, TimedMutex};

pub use osal_types::{
    DEFAULT_PROCESS_NAME, Deadline, Fatal, FatalKind, FatalReporting, OsalError, Policy,
    SleepStrategy, ZeroSizePolicy,
};

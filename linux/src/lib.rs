//! Linux backend for the OS abstraction layer.
//!
//! | contract | primitive |
//! |---|---|
//! | [`LinuxMutex`] | `pthread_mutex_t` (`PTHREAD_MUTEX_ERRORCHECK`) + `pthread_mutex_timedlock` |
//! | [`LinuxSemaphore`] | unnamed `sem_t` + `sem_timedwait` |
//! | clock | `clock_gettime(CLOCK_REALTIME)` |
//! | sleep | `nanosleep`, or a busy poll when configured |
//! | heap | `malloc` / `free` |
//! | launcher | detached `std::thread` |
//!
//! Timed waits take absolute `CLOCK_REALTIME` deadlines, computed fresh per call.

#![cfg(target_os = "linux")]

mod destroy;
mod heap;
mod mutex;
mod platform;
mod semaphore;
mod time;

pub use mutex::LinuxMutex;
pub use platform::LinuxPlatform;
pub use semaphore::LinuxSemaphore;
pub use time::{deadline_from_now, wall_clock};

use std::ptr::NonNull;

use osal_types::{Fatal, OsalError, Policy};

/// A unit of work handed to [`Platform::spawn_task`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Exclusive lock with a bounded wait.
///
/// Not re-entrant. A holder that calls [`wait`](TimedMutex::wait) again gets `false`
/// back promptly instead of deadlocking. Ordering among several waiters is whatever
/// the backend primitive provides.
pub trait TimedMutex: Send + Sync {
    /// Acquire the lock, blocking for at most `timeout_ms`. `0` never blocks.
    fn wait(&self, timeout_ms: u32) -> bool;

    /// Release the lock. Releasing a lock the caller does not hold is fatal.
    fn signal(&self) -> Result<(), Fatal>;
}

/// Binary signal/wait primitive, created unavailable.
///
/// One `signal` guarantees at least one subsequent successful `wait`; a successful
/// `wait` consumes the permit.
pub trait BinarySemaphore: Send + Sync {
    fn wait(&self, timeout_ms: u32) -> bool;

    fn signal(&self) -> Result<(), Fatal>;

    /// Destroy the primitive and report a failure instead of only logging it on drop.
    fn close(self) -> Result<(), Fatal>
    where
        Self: Sized;
}

/// One operating-system binding.
///
/// A backend keeps no handles of its own: every `create_*` call returns a new handle
/// owned by the caller. Share a handle between threads by wrapping it (e.g. `Arc`).
pub trait Platform: Send + Sync {
    type Mutex: TimedMutex + 'static;
    type Semaphore: BinarySemaphore + 'static;

    fn policy(&self) -> Policy;

    /// Wall-clock milliseconds truncated to 32 bits. Not immune to clock adjustments.
    fn now_ms(&self) -> u32;

    /// Block the calling thread for at least `ms` milliseconds.
    fn sleep(&self, ms: u32);

    fn create_mutex(&self) -> Result<Self::Mutex, Fatal>;

    fn create_semaphore(&self) -> Result<Self::Semaphore, Fatal>;

    /// Allocate `size` bytes from the host allocator.
    ///
    /// `allocate(0)` follows [`Policy::zero_size`]. `None` otherwise means the
    /// allocator is exhausted.
    fn allocate(&self, size: u32) -> Option<NonNull<u8>>;

    /// Return an allocation to the host allocator. `None` is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Platform::allocate) on the same backend and
    /// must not have been freed already.
    unsafe fn free(&self, ptr: Option<NonNull<u8>>);

    /// Start `task` on a detached thread and return without joining it.
    ///
    /// `name` is advisory; it shows up in logs and as the thread name, and defaults
    /// to [`DEFAULT_PROCESS_NAME`](osal_types::DEFAULT_PROCESS_NAME).
    fn spawn_task(&self, name: Option<&str>, task: Task) -> Result<(), OsalError>;

    /// Start `entry(arg)` on a detached thread.
    fn run_process<A>(&self, entry: fn(A), name: Option<&str>, arg: A) -> Result<(), OsalError>
    where
        Self: Sized,
        A: Send + 'static,
    {
        self.spawn_task(name, Box::new(move || entry(arg)))
    }
}

use std::cell::UnsafeCell;
use std::fmt;
use std::io;
use std::mem;

use osal_core::{BinarySemaphore, raise};
use osal_types::{Fatal, FatalKind, FatalReporting};

use crate::destroy::report_destroy_failure;
use crate::time::deadline_from_now;

/// Unnamed POSIX semaphore used with binary semantics.
///
/// `sem_t` counts; `signal` skips the post while a permit is already pending, so
/// repeated signals collapse to one. Two racing signals can still both post.
pub struct LinuxSemaphore {
    raw: Box<UnsafeCell<libc::sem_t>>,
    reporting: FatalReporting,
    live: bool,
}

// SAFETY: POSIX semaphores are designed to be shared between threads; every access goes
// through the sem_* API.
unsafe impl Send for LinuxSemaphore {}
// SAFETY: see above.
unsafe impl Sync for LinuxSemaphore {}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

impl LinuxSemaphore {
    pub(crate) fn new(reporting: FatalReporting) -> Result<Self, Fatal> {
        // SAFETY: all-zero is a valid placeholder; `sem_init` fully initializes it.
        let raw = Box::new(UnsafeCell::new(unsafe { mem::zeroed::<libc::sem_t>() }));
        // SAFETY: `raw` is a stable heap address; pshared = 0, initial value = 0.
        if unsafe { libc::sem_init(raw.get(), 0, 0) } == -1 {
            return Err(raise(FatalKind::SemaphoreInit, Some(last_errno()), reporting));
        }
        Ok(Self {
            raw,
            reporting,
            live: true,
        })
    }

    fn destroy(&mut self) -> Result<(), i32> {
        if !self.live {
            return Ok(());
        }
        self.live = false;
        // SAFETY: initialized in `new`; `live` guarantees a single destroy.
        if unsafe { libc::sem_destroy(self.raw.get()) } == -1 {
            return Err(last_errno());
        }
        Ok(())
    }

    fn pending(&self) -> bool {
        let mut value: libc::c_int = 0;
        // SAFETY: initialized in `new`; `value` is a valid out-pointer.
        let rc = unsafe { libc::sem_getvalue(self.raw.get(), &raw mut value) };
        rc == 0 && value > 0
    }
}

impl BinarySemaphore for LinuxSemaphore {
    fn wait(&self, timeout_ms: u32) -> bool {
        let deadline = deadline_from_now(timeout_ms);
        loop {
            // SAFETY: initialized in `new` and not destroyed while `&self` exists.
            if unsafe { libc::sem_timedwait(self.raw.get(), &raw const deadline) } == 0 {
                return true;
            }
            match last_errno() {
                libc::EINTR => {}
                libc::ETIMEDOUT => {
                    tracing::debug!(timeout_ms, "Semaphore wait timed out");
                    return false;
                }
                errno => {
                    if self.reporting.is_logged() {
                        tracing::error!(
                            errno,
                            "Failed to wait on semaphore: {}",
                            io::Error::from_raw_os_error(errno)
                        );
                    }
                    return false;
                }
            }
        }
    }

    fn signal(&self) -> Result<(), Fatal> {
        if self.pending() {
            return Ok(());
        }
        // SAFETY: initialized in `new` and not destroyed while `&self` exists.
        if unsafe { libc::sem_post(self.raw.get()) } == -1 {
            return Err(raise(
                FatalKind::SemaphoreSignal,
                Some(last_errno()),
                self.reporting,
            ));
        }
        Ok(())
    }

    fn close(mut self) -> Result<(), Fatal> {
        self.destroy()
            .map_err(|errno| raise(FatalKind::SemaphoreDestroy, Some(errno), self.reporting))
    }
}

impl Drop for LinuxSemaphore {
    fn drop(&mut self) {
        if let Err(errno) = self.destroy() {
            report_destroy_failure("sem_destroy", errno, self.reporting);
        }
    }
}

impl fmt::Debug for LinuxSemaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinuxSemaphore")
            .field("reporting", &self.reporting)
            .field("pending", &(self.live && self.pending()))
            .finish_non_exhaustive()
    }
}

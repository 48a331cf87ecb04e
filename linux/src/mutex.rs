use std::cell::UnsafeCell;
use std::fmt;
use std::io;
use std::mem::MaybeUninit;

use osal_core::{TimedMutex, raise};
use osal_types::{Fatal, FatalKind, FatalReporting};

use crate::destroy::report_destroy_failure;
use crate::time::deadline_from_now;

/// Error-checking pthread mutex with a timed acquire.
///
/// The `pthread_mutex_t` lives in its own heap cell so the handle can move after
/// `pthread_mutex_init` without moving the primitive.
pub struct LinuxMutex {
    raw: Box<UnsafeCell<libc::pthread_mutex_t>>,
    reporting: FatalReporting,
}

// SAFETY: pthread mutexes are designed to be shared between threads; every access goes
// through the pthread API.
unsafe impl Send for LinuxMutex {}
// SAFETY: see above.
unsafe impl Sync for LinuxMutex {}

impl LinuxMutex {
    pub(crate) fn new(reporting: FatalReporting) -> Result<Self, Fatal> {
        let raw = Box::new(UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER));
        let mut attr = MaybeUninit::<libc::pthread_mutexattr_t>::uninit();

        // SAFETY: `attr` is initialized by `pthread_mutexattr_init` before any other use
        // and destroyed exactly once; `raw` is a stable heap address.
        let rc = unsafe {
            let rc = libc::pthread_mutexattr_init(attr.as_mut_ptr());
            if rc != 0 {
                return Err(raise(FatalKind::MutexInit, Some(rc), reporting));
            }
            let mut rc =
                libc::pthread_mutexattr_settype(attr.as_mut_ptr(), libc::PTHREAD_MUTEX_ERRORCHECK);
            if rc == 0 {
                rc = libc::pthread_mutex_init(raw.get(), attr.as_ptr());
            }
            libc::pthread_mutexattr_destroy(attr.as_mut_ptr());
            rc
        };
        if rc != 0 {
            return Err(raise(FatalKind::MutexInit, Some(rc), reporting));
        }

        Ok(Self { raw, reporting })
    }
}

impl TimedMutex for LinuxMutex {
    fn wait(&self, timeout_ms: u32) -> bool {
        let deadline = deadline_from_now(timeout_ms);
        // SAFETY: `raw` was initialized in `new` and is not destroyed until drop.
        let rc = unsafe { libc::pthread_mutex_timedlock(self.raw.get(), &raw const deadline) };
        match rc {
            0 => true,
            libc::ETIMEDOUT => {
                tracing::debug!(timeout_ms, "Mutex wait timed out");
                false
            }
            libc::EDEADLK => {
                if self.reporting.is_logged() {
                    tracing::error!("Failed to lock mutex: already held by the calling thread");
                }
                false
            }
            other => {
                if self.reporting.is_logged() {
                    tracing::error!(
                        errno = other,
                        "Failed to lock mutex: {}",
                        io::Error::from_raw_os_error(other)
                    );
                }
                false
            }
        }
    }

    fn signal(&self) -> Result<(), Fatal> {
        // SAFETY: `raw` was initialized in `new` and is not destroyed until drop.
        let rc = unsafe { libc::pthread_mutex_unlock(self.raw.get()) };
        if rc != 0 {
            return Err(raise(FatalKind::MutexUnlock, Some(rc), self.reporting));
        }
        Ok(())
    }
}

impl Drop for LinuxMutex {
    fn drop(&mut self) {
        // SAFETY: no other reference can exist while `&mut self` is held.
        let rc = unsafe { libc::pthread_mutex_destroy(self.raw.get()) };
        if rc != 0 {
            report_destroy_failure("pthread_mutex_destroy", rc, self.reporting);
        }
    }
}

impl fmt::Debug for LinuxMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinuxMutex")
            .field("reporting", &self.reporting)
            .finish_non_exhaustive()
    }
}

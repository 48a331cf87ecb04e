use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use osal_core::{TimedMutex, raise};
use osal_types::{Deadline, Fatal, FatalKind, FatalReporting};

use crate::wall_clock;

/// Timed mutex tracking its owner thread, so relocking and foreign unlocks are caught
/// the way an error-checking pthread mutex catches them.
#[derive(Debug)]
pub struct PortableMutex {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
    reporting: FatalReporting,
}

impl PortableMutex {
    pub(crate) fn new(reporting: FatalReporting) -> Self {
        Self {
            owner: Mutex::new(None),
            released: Condvar::new(),
            reporting,
        }
    }

    fn owner(&self) -> MutexGuard<'_, Option<ThreadId>> {
        // The guarded value is a plain ThreadId; a panic elsewhere cannot leave it torn.
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimedMutex for PortableMutex {
    fn wait(&self, timeout_ms: u32) -> bool {
        let deadline = Deadline::after(wall_clock(), timeout_ms);
        let me = thread::current().id();
        let mut owner = self.owner();
        loop {
            match *owner {
                None => {
                    *owner = Some(me);
                    return true;
                }
                Some(holder) if holder == me => {
                    if self.reporting.is_logged() {
                        tracing::error!("Failed to lock mutex: already held by the calling thread");
                    }
                    return false;
                }
                Some(_) => {
                    let remaining = deadline.remaining_from(wall_clock());
                    if remaining.is_zero() {
                        tracing::debug!(timeout_ms, "Mutex wait timed out");
                        return false;
                    }
                    owner = self
                        .released
                        .wait_timeout(owner, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
            }
        }
    }

    fn signal(&self) -> Result<(), Fatal> {
        let mut owner = self.owner();
        if *owner != Some(thread::current().id()) {
            return Err(raise(FatalKind::MutexUnlock, None, self.reporting));
        }
        *owner = None;
        drop(owner);
        self.released.notify_one();
        Ok(())
    }
}

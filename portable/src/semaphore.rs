use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use osal_core::BinarySemaphore;
use osal_types::{Deadline, Fatal};

use crate::wall_clock;

/// Strictly binary semaphore: signals never accumulate past one permit.
#[derive(Debug, Default)]
pub struct PortableSemaphore {
    available: Mutex<bool>,
    signalled: Condvar,
}

impl PortableSemaphore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn available(&self) -> MutexGuard<'_, bool> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BinarySemaphore for PortableSemaphore {
    fn wait(&self, timeout_ms: u32) -> bool {
        let deadline = Deadline::after(wall_clock(), timeout_ms);
        let mut available = self.available();
        loop {
            if *available {
                *available = false;
                return true;
            }
            let remaining = deadline.remaining_from(wall_clock());
            if remaining.is_zero() {
                tracing::debug!(timeout_ms, "Semaphore wait timed out");
                return false;
            }
            available = self
                .signalled
                .wait_timeout(available, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    fn signal(&self) -> Result<(), Fatal> {
        *self.available() = true;
        self.signalled.notify_one();
        Ok(())
    }

    fn close(self) -> Result<(), Fatal> {
        Ok(())
    }
}

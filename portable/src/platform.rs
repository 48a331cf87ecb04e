use std::ptr::NonNull;
use std::thread;
use std::time::Duration;

use osal_config::{ConfigError, OsalConfig};
use osal_core::{Platform, Task, busy_poll_sleep, spawn_detached};
use osal_types::{Fatal, OsalError, Policy, SleepStrategy};

use crate::{PortableMutex, PortableSemaphore, heap, wall_clock};

fn now_ms() -> u32 {
    wall_clock().epoch_millis_u32()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PortablePlatform {
    policy: Policy,
}

impl PortablePlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Policy::canonical())
    }

    #[must_use]
    pub fn with_policy(policy: Policy) -> Self {
        if policy.zero_size.is_deprecated() {
            tracing::warn!(
                zero_size = %policy.zero_size,
                "Non-null zero-size allocation is deprecated; prefer zero_size = \"null\""
            );
        }
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &OsalConfig) -> Self {
        Self::with_policy(config.policy())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        OsalConfig::load().map(|config| Self::from_config(&config))
    }
}

impl Platform for PortablePlatform {
    type Mutex = PortableMutex;
    type Semaphore = PortableSemaphore;

    fn policy(&self) -> Policy {
        self.policy
    }

    fn now_ms(&self) -> u32 {
        now_ms()
    }

    fn sleep(&self, ms: u32) {
        match self.policy.sleep {
            SleepStrategy::Passive => thread::sleep(Duration::from_millis(u64::from(ms))),
            SleepStrategy::BusyPoll => busy_poll_sleep(now_ms, ms),
        }
    }

    fn create_mutex(&self) -> Result<PortableMutex, Fatal> {
        Ok(PortableMutex::new(self.policy.reporting))
    }

    fn create_semaphore(&self) -> Result<PortableSemaphore, Fatal> {
        Ok(PortableSemaphore::new())
    }

    fn allocate(&self, size: u32) -> Option<NonNull<u8>> {
        heap::allocate(size, self.policy.zero_size)
    }

    unsafe fn free(&self, ptr: Option<NonNull<u8>>) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { heap::free(ptr) };
    }

    fn spawn_task(&self, name: Option<&str>, task: Task) -> Result<(), OsalError> {
        spawn_detached(name, task)
    }
}

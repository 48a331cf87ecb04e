use std::ptr::NonNull;

use osal_config::{ConfigError, OsalConfig};
use osal_core::{Platform, Task, busy_poll_sleep, spawn_detached};
use osal_types::{Fatal, OsalError, Policy, SleepStrategy};

use crate::{LinuxMutex, LinuxSemaphore, heap, time};

/// The Linux binding. Holds only its [`Policy`]; handles belong to whoever created them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxPlatform {
    policy: Policy,
}

impl LinuxPlatform {
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
        if policy.sleep == SleepStrategy::BusyPoll {
            tracing::info!("Busy-poll sleep enabled");
        }
        Self { policy }
    }

    #[must_use]
    pub fn from_config(config: &OsalConfig) -> Self {
        Self::with_policy(config.policy())
    }

    /// Build from the config file and `OSAL_*` environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        OsalConfig::load().map(|config| Self::from_config(&config))
    }
}

impl Platform for LinuxPlatform {
    type Mutex = LinuxMutex;
    type Semaphore = LinuxSemaphore;

    fn policy(&self) -> Policy {
        self.policy
    }

    fn now_ms(&self) -> u32 {
        time::now_ms()
    }

    fn sleep(&self, ms: u32) {
        match self.policy.sleep {
            SleepStrategy::Passive => time::passive_sleep(ms),
            SleepStrategy::BusyPoll => busy_poll_sleep(time::now_ms, ms),
        }
    }

    fn create_mutex(&self) -> Result<LinuxMutex, Fatal> {
        LinuxMutex::new(self.policy.reporting)
    }

    fn create_semaphore(&self) -> Result<LinuxSemaphore, Fatal> {
        LinuxSemaphore::new(self.policy.reporting)
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

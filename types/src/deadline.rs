//! Absolute deadlines for timed waits.
//!
//! Timed wait primitives (`pthread_mutex_timedlock`, `sem_timedwait`, condvar waits)
//! take an absolute wall-clock point rather than a relative duration. A [`Deadline`]
//! is computed once per wait call from "now + timeout" and never cached: wall-clock
//! time advances between calls.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const MILLIS_PER_SEC: u32 = 1_000;

/// An absolute wall-clock instant, split into seconds and nanoseconds since the epoch.
///
/// Invariant: `0 <= nanos < NANOS_PER_SEC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    secs: i64,
    nanos: i64,
}

impl Deadline {
    /// Build from raw `timespec`-style parts. Returns `None` when `nanos` is out of range.
    #[must_use]
    pub const fn from_parts(secs: i64, nanos: i64) -> Option<Self> {
        if nanos < 0 || nanos >= NANOS_PER_SEC {
            return None;
        }
        Some(Self { secs, nanos })
    }

    /// Convert a `SystemTime` (which may predate the epoch) into a normalized instant.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self {
                secs: i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
                nanos: i64::from(since.subsec_nanos()),
            },
            Err(err) => {
                let before = err.duration();
                let mut secs = -i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                let mut nanos = i64::from(before.subsec_nanos());
                if nanos > 0 {
                    secs -= 1;
                    nanos = NANOS_PER_SEC - nanos;
                }
                Self { secs, nanos }
            }
        }
    }

    /// The instant `timeout_ms` milliseconds after `now`.
    ///
    /// Milliseconds are split into whole seconds and a nanosecond remainder. When the
    /// remainder pushes the sub-second part past one second, one second is carried.
    #[must_use]
    pub const fn after(now: Self, timeout_ms: u32) -> Self {
        let mut secs = now.secs.saturating_add((timeout_ms / MILLIS_PER_SEC) as i64);
        let mut nanos = now.nanos + (timeout_ms % MILLIS_PER_SEC) as i64 * NANOS_PER_MILLI;
        if nanos >= NANOS_PER_SEC {
            secs = secs.saturating_add(1);
            nanos -= NANOS_PER_SEC;
        }
        Self { secs, nanos }
    }

    #[must_use]
    pub const fn secs(self) -> i64 {
        self.secs
    }

    #[must_use]
    pub const fn nanos(self) -> i64 {
        self.nanos
    }

    /// Time left until this deadline as seen from `now`; zero once it has passed.
    #[must_use]
    pub fn remaining_from(self, now: Self) -> Duration {
        if self <= now {
            return Duration::ZERO;
        }
        let mut secs = self.secs - now.secs;
        let mut nanos = self.nanos - now.nanos;
        if nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SEC;
        }
        Duration::new(secs as u64, nanos as u32)
    }

    /// Milliseconds since the epoch, truncated to 32 bits.
    ///
    /// Wraps roughly every 49.7 days. Compare two readings with `wrapping_sub`.
    #[must_use]
    pub const fn epoch_millis_u32(self) -> u32 {
        self.secs
            .wrapping_mul(MILLIS_PER_SEC as i64)
            .wrapping_add(self.nanos / NANOS_PER_MILLI) as u32
    }
}

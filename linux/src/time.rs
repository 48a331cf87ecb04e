use std::io;
use std::mem;
use std::time::SystemTime;

use osal_types::{Deadline, MILLIS_PER_SEC, NANOS_PER_MILLI};

/// Current `CLOCK_REALTIME` reading.
#[must_use]
pub fn wall_clock() -> Deadline {
    // SAFETY: all-zero is a valid `timespec`.
    let mut ts: libc::timespec = unsafe { mem::zeroed() };
    // SAFETY: `ts` is a valid out-pointer for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &raw mut ts) };
    if rc == 0
        && let Some(now) = Deadline::from_parts(ts.tv_sec as i64, ts.tv_nsec as i64)
    {
        return now;
    }
    tracing::debug!(
        "clock_gettime(CLOCK_REALTIME) failed: {}",
        io::Error::last_os_error()
    );
    Deadline::from_system_time(SystemTime::now())
}

/// Absolute `timespec` `timeout_ms` milliseconds from now, for the timed-wait calls.
#[must_use]
pub fn deadline_from_now(timeout_ms: u32) -> libc::timespec {
    to_timespec(Deadline::after(wall_clock(), timeout_ms))
}

pub(crate) fn to_timespec(deadline: Deadline) -> libc::timespec {
    // SAFETY: all-zero is a valid `timespec`; some targets carry private padding.
    let mut ts: libc::timespec = unsafe { mem::zeroed() };
    ts.tv_sec = deadline.secs() as libc::time_t;
    ts.tv_nsec = deadline.nanos() as libc::c_long;
    ts
}

pub(crate) fn now_ms() -> u32 {
    wall_clock().epoch_millis_u32()
}

/// `nanosleep` for `ms`, resuming with the remaining time after a signal.
pub(crate) fn passive_sleep(ms: u32) {
    // SAFETY: all-zero is a valid `timespec`.
    let mut request: libc::timespec = unsafe { mem::zeroed() };
    request.tv_sec = (ms / MILLIS_PER_SEC) as libc::time_t;
    request.tv_nsec = (i64::from(ms % MILLIS_PER_SEC) * NANOS_PER_MILLI) as libc::c_long;

    loop {
        // SAFETY: all-zero is a valid `timespec`.
        let mut remaining: libc::timespec = unsafe { mem::zeroed() };
        // SAFETY: both pointers are valid for the duration of the call.
        let rc = unsafe { libc::nanosleep(&raw const request, &raw mut remaining) };
        if rc == 0 {
            return;
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            request = remaining;
            continue;
        }
        tracing::warn!("nanosleep failed: {err}");
        return;
    }
}

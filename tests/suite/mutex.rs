//! Timed mutex tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use osal_core::{FatalKind, Platform, TimedMutex};

use crate::common::{capture_logs, elapsed_ms};

fn fresh_mutex_is_acquired_first_try(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    assert!(mutex.wait(10));
    mutex.signal().expect("unlock");
}

fn waiter_blocks_until_holder_signals(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    assert!(mutex.wait(10_000));

    let second_locked = AtomicBool::new(false);
    thread::scope(|scope| {
        let waiter = scope.spawn(|| {
            assert!(mutex.wait(10_000));
            second_locked.store(true, Ordering::SeqCst);
            mutex.signal().expect("waiter unlock");
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!second_locked.load(Ordering::SeqCst));

        mutex.signal().expect("holder unlock");
        waiter.join().expect("waiter thread");
    });

    assert!(second_locked.load(Ordering::SeqCst));
}

fn waiter_times_out_when_never_signalled(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    assert!(mutex.wait(10_000));

    let second_locked = AtomicBool::new(false);
    thread::scope(|scope| {
        let waiter = scope.spawn(|| {
            let started = Instant::now();
            let acquired = mutex.wait(50);
            let waited = elapsed_ms(started);
            if acquired {
                second_locked.store(true, Ordering::SeqCst);
                mutex.signal().expect("waiter unlock");
            }
            (acquired, waited)
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!second_locked.load(Ordering::SeqCst));
        mutex.signal().expect("holder unlock");

        let (acquired, waited) = waiter.join().expect("waiter thread");
        assert!(!acquired);
        assert!(waited >= 45, "gave up after {waited} ms");
        assert!(waited < 1_000, "gave up after {waited} ms");
    });

    assert!(!second_locked.load(Ordering::SeqCst));
}

fn relock_by_holder_fails_promptly(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    assert!(mutex.wait(10));

    let started = Instant::now();
    assert!(!mutex.wait(5_000));
    assert!(elapsed_ms(started) < 1_000);

    mutex.signal().expect("unlock");
}

fn signalling_an_unheld_mutex_is_fatal(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    let fatal = mutex.signal().unwrap_err();
    assert_eq!(fatal.kind(), FatalKind::MutexUnlock);
    assert_eq!(fatal.exit_code(), 1);
}

fn mutex_is_reusable_after_release(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    for _ in 0..100 {
        assert!(mutex.wait(0));
        mutex.signal().expect("unlock");
    }
}

fn handles_are_independent(platform: &impl Platform) {
    let first = platform.create_mutex().expect("create mutex");
    let second = platform.create_mutex().expect("create mutex");
    assert!(first.wait(10));
    assert!(second.wait(10));
    first.signal().expect("unlock first");
    second.signal().expect("unlock second");
}

fn unheld_signal_is_logged_as_error(platform: &impl Platform) {
    let mutex = platform.create_mutex().expect("create mutex");
    let (result, logs) = capture_logs(|| mutex.signal());

    let fatal = result.unwrap_err();
    assert_eq!(fatal.kind(), FatalKind::MutexUnlock);
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("mutex unlock failed"), "{logs}");
}

backend_tests!(
    fresh_mutex_is_acquired_first_try,
    waiter_blocks_until_holder_signals,
    waiter_times_out_when_never_signalled,
    relock_by_holder_fails_promptly,
    signalling_an_unheld_mutex_is_fatal,
    unheld_signal_is_logged_as_error,
    mutex_is_reusable_after_release,
    handles_are_independent,
);

#[cfg(target_os = "linux")]
#[test]
fn linux_unheld_signal_reports_eperm() {
    let platform = osal_linux::LinuxPlatform::new();
    let mutex = platform.create_mutex().expect("create mutex");
    let fatal = mutex.signal().unwrap_err();
    assert_eq!(fatal.errno(), Some(libc::EPERM));
}

mod silent {
    use osal_core::{FatalKind, FatalReporting, Platform, Policy, TimedMutex};

    use super::signalling_an_unheld_mutex_is_fatal;
    use crate::common::capture_logs;

    fn unheld_signal_fails_without_logging(platform: &impl Platform) {
        let mutex = platform.create_mutex().expect("create mutex");
        let (result, logs) = capture_logs(|| mutex.signal());

        let fatal = result.unwrap_err();
        assert_eq!(fatal.kind(), FatalKind::MutexUnlock);
        assert_eq!(logs, "");
    }

    backend_tests!(
        policy = Policy::canonical().with_reporting(FatalReporting::Silent);
        signalling_an_unheld_mutex_is_fatal,
        unheld_signal_fails_without_logging,
    );
}

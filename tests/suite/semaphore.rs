//! Binary semaphore tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use osal_core::{BinarySemaphore, Platform};

use crate::common::elapsed_ms;

fn fresh_semaphore_times_out(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    assert!(!semaphore.wait(10));
}

fn signal_then_wait_succeeds(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    semaphore.signal().expect("signal");
    assert!(semaphore.wait(10));
}

fn second_wait_without_signal_fails(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    semaphore.signal().expect("signal");
    assert!(semaphore.wait(10));
    assert!(!semaphore.wait(10));
}

fn timeout_is_not_early(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    let started = Instant::now();
    assert!(!semaphore.wait(50));
    let waited = elapsed_ms(started);
    assert!(waited >= 45, "gave up after {waited} ms");
}

fn permit_is_handed_to_a_waiting_thread(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    semaphore.signal().expect("signal");
    assert!(semaphore.wait(10_000));

    let second_locked = AtomicBool::new(false);
    thread::scope(|scope| {
        let waiter = scope.spawn(|| {
            assert!(semaphore.wait(10_000));
            second_locked.store(true, Ordering::SeqCst);
            semaphore.signal().expect("waiter signal");
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!second_locked.load(Ordering::SeqCst));

        semaphore.signal().expect("signal");
        waiter.join().expect("waiter thread");
    });

    assert!(second_locked.load(Ordering::SeqCst));
}

fn waiter_times_out_when_never_signalled(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");

    thread::scope(|scope| {
        let waiter = scope.spawn(|| semaphore.wait(50));
        thread::sleep(Duration::from_millis(100));
        assert!(!waiter.join().expect("waiter thread"));
    });

    // Still usable after a timed-out wait.
    semaphore.signal().expect("signal");
    assert!(semaphore.wait(10));
}

fn close_fresh_semaphore(platform: &impl Platform) {
    let semaphore = platform.create_semaphore().expect("create semaphore");
    semaphore.close().expect("destroy");
}

backend_tests!(
    fresh_semaphore_times_out,
    signal_then_wait_succeeds,
    second_wait_without_signal_fails,
    timeout_is_not_early,
    permit_is_handed_to_a_waiting_thread,
    waiter_times_out_when_never_signalled,
    close_fresh_semaphore,
);

//! Clock and sleep tests

use std::time::Instant;

use osal_core::{Platform, SleepStrategy};

use crate::common::elapsed_ms;

const SLEEP_MS: u32 = 10;
const REPEAT: u32 = 10;
const SLACK_MS: u32 = 100;

fn sleep_bounds(platform: &impl Platform) {
    let mut overslept = 0;
    for _ in 0..REPEAT {
        let before = platform.now_ms();
        platform.sleep(SLEEP_MS);
        let after = platform.now_ms();

        let slept = after.wrapping_sub(before);
        assert!(slept >= SLEEP_MS, "slept {slept} ms, asked for {SLEEP_MS}");
        if slept >= SLEEP_MS + SLACK_MS {
            overslept += 1;
        }
    }
    assert_eq!(overslept, 0, "sleep overshot by {SLACK_MS} ms or more");
}

fn sleep_zero_returns_promptly(platform: &impl Platform) {
    let started = Instant::now();
    platform.sleep(0);
    assert!(elapsed_ms(started) < 50);
}

fn now_ms_does_not_go_backwards_over_a_short_run(platform: &impl Platform) {
    let mut last = platform.now_ms();
    for _ in 0..1_000 {
        let now = platform.now_ms();
        // Small forward steps only; a wrap would show up as a huge difference.
        assert!(now.wrapping_sub(last) < 1_000, "clock jumped from {last} to {now}");
        last = now;
    }
}

fn default_sleep_is_passive(platform: &impl Platform) {
    assert_eq!(platform.policy().sleep, SleepStrategy::Passive);
}

backend_tests!(
    sleep_bounds,
    sleep_zero_returns_promptly,
    now_ms_does_not_go_backwards_over_a_short_run,
    default_sleep_is_passive,
);

mod busy_poll {
    use osal_core::{Platform, Policy, SleepStrategy};

    use super::sleep_bounds;

    fn busy_poll_is_selected(platform: &impl Platform) {
        assert_eq!(platform.policy().sleep, SleepStrategy::BusyPoll);
    }

    backend_tests!(
        policy = Policy::canonical().with_sleep(SleepStrategy::BusyPoll);
        sleep_bounds,
        busy_poll_is_selected,
    );
}

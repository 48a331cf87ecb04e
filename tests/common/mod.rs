//! Shared test utilities and fixtures
//!
//! `backend_tests!` instantiates generic `fn(&impl Platform)` checks once per backend.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::time::Instant;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route library logs to the test writer. `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn elapsed_ms(started: Instant) -> u128 {
    started.elapsed().as_millis()
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with every event on this thread written, without ANSI colour, into the returned string.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
    (value, String::from_utf8_lossy(&bytes).into_owned())
}

macro_rules! backend_tests {
    ($($test:ident),* $(,)?) => {
        backend_tests!(policy = ::osal_core::Policy::canonical(); $($test),*);
    };
    (policy = $policy:expr; $($test:ident),* $(,)?) => {
        fn backend_policy() -> ::osal_core::Policy {
            $policy
        }

        #[cfg(target_os = "linux")]
        mod linux {
            $(
                #[test]
                fn $test() {
                    $crate::common::init_tracing();
                    super::$test(&::osal_linux::LinuxPlatform::with_policy(super::backend_policy()));
                }
            )*
        }

        mod portable {
            $(
                #[test]
                fn $test() {
                    $crate::common::init_tracing();
                    super::$test(&::osal_portable::PortablePlatform::with_policy(super::backend_policy()));
                }
            )*
        }
    };
}

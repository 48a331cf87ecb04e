//! Error taxonomy.
//!
//! - Timeouts are not errors: `wait` returns `false`.
//! - Resource exhaustion is a value: `allocate` returns `None`, spawning returns
//!   [`OsalError::Spawn`].
//! - A broken or misused lock primitive is [`Fatal`]. The layer never exits the
//!   process itself; the application is expected to escalate.

use std::fmt;
use std::io;

use thiserror::Error;

/// Which primitive operation failed fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalKind {
    MutexInit,
    MutexUnlock,
    SemaphoreInit,
    SemaphoreSignal,
    SemaphoreDestroy,
}

impl FatalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MutexInit => "mutex init",
            Self::MutexUnlock => "mutex unlock",
            Self::SemaphoreInit => "semaphore init",
            Self::SemaphoreSignal => "semaphore signal",
            Self::SemaphoreDestroy => "semaphore destroy",
        }
    }

    #[must_use]
    pub const fn is_mutex(self) -> bool {
        matches!(self, Self::MutexInit | Self::MutexUnlock)
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn os_detail(code: i32) -> String {
    format!(": {}", io::Error::from_raw_os_error(code))
}

/// A lock-primitive failure the process cannot safely continue past.
///
/// Returned instead of exiting so the decision to terminate stays with the
/// application. Dropping one on the floor is a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} failed{}", .errno.map_or_else(String::new, os_detail))]
#[must_use = "a fatal primitive failure must be escalated"]
pub struct Fatal {
    kind: FatalKind,
    errno: Option<i32>,
}

impl Fatal {
    /// A failure reported by the OS with an error code.
    pub const fn os(kind: FatalKind, errno: i32) -> Self {
        Self {
            kind,
            errno: Some(errno),
        }
    }

    /// A misuse detected by the layer itself, with no OS error code behind it.
    pub const fn misuse(kind: FatalKind) -> Self {
        Self { kind, errno: None }
    }

    #[must_use]
    pub const fn kind(&self) -> FatalKind {
        self.kind
    }

    #[must_use]
    pub const fn errno(&self) -> Option<i32> {
        self.errno
    }

    /// Process exit status used when this failure is escalated.
    ///
    /// Mutex failures exit with `EXIT_FAILURE`; semaphore failures exit with the OS
    /// error code, falling back to `EXIT_FAILURE` when there is none.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        const EXIT_FAILURE: i32 = 1;
        if self.kind.is_mutex() {
            return EXIT_FAILURE;
        }
        match self.errno {
            Some(code) if code > 0 => code,
            _ => EXIT_FAILURE,
        }
    }
}

/// Recoverable failures, always returned as values.
#[derive(Debug, Error)]
pub enum OsalError {
    #[error("failed to spawn process {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

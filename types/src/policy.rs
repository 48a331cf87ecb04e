//! Behavior profiles for a backend.
//!
//! The layer historically shipped two interface variants that disagreed on two
//! behaviors: what `allocate(0)` returns, and whether a fatal lock-primitive failure
//! is logged before the process is taken down. Both are kept as explicit switches so
//! the choice is visible at construction time instead of being an accident of which
//! variant got linked.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// What `allocate(0)` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroSizePolicy {
    /// `allocate(0)` returns no allocation.
    #[default]
    NullOnZero,
    /// `allocate(0)` returns a valid, freeable allocation.
    ///
    /// Legacy behavior of the mutex-only interface. Deprecated: backends log a warning
    /// when constructed with it.
    NonNullOnZero,
}

impl ZeroSizePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullOnZero => "null",
            Self::NonNullOnZero => "non-null",
        }
    }

    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::NonNullOnZero)
    }
}

/// How much is reported when a lock primitive fails fatally.
///
/// Fatal-ness never changes; only diagnostic richness does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatalReporting {
    /// Log the failure (with the OS error) before returning the fatal result.
    #[default]
    Logged,
    /// Return the fatal result without logging.
    Silent,
}

impl FatalReporting {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logged => "logged",
            Self::Silent => "silent",
        }
    }

    #[must_use]
    pub const fn is_logged(self) -> bool {
        matches!(self, Self::Logged)
    }
}

/// How `sleep` waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepStrategy {
    /// Suspend the thread in the kernel.
    #[default]
    Passive,
    /// Spin on the millisecond clock. Burns a core; opt-in only.
    BusyPoll,
}

impl SleepStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::BusyPoll => "busy-poll",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {setting} value {value:?} (expected one of: {expected})")]
pub struct ParsePolicyError {
    setting: &'static str,
    value: String,
    expected: &'static str,
}

impl ParsePolicyError {
    #[must_use]
    pub const fn setting(&self) -> &'static str {
        self.setting
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for ZeroSizePolicy {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "null" | "null-on-zero" => Ok(Self::NullOnZero),
            "non-null" | "nonnull" | "non-null-on-zero" => Ok(Self::NonNullOnZero),
            _ => Err(ParsePolicyError {
                setting: "zero_size",
                value: raw.to_string(),
                expected: "null, non-null",
            }),
        }
    }
}

impl FromStr for FatalReporting {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "logged" | "log" => Ok(Self::Logged),
            "silent" | "quiet" => Ok(Self::Silent),
            _ => Err(ParsePolicyError {
                setting: "reporting",
                value: raw.to_string(),
                expected: "logged, silent",
            }),
        }
    }
}

impl FromStr for SleepStrategy {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "passive" => Ok(Self::Passive),
            "busy-poll" | "busy" => Ok(Self::BusyPoll),
            _ => Err(ParsePolicyError {
                setting: "sleep",
                value: raw.to_string(),
                expected: "passive, busy-poll",
            }),
        }
    }
}

impl fmt::Display for ZeroSizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FatalReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SleepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of switches a backend is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    pub zero_size: ZeroSizePolicy,
    pub reporting: FatalReporting,
    pub sleep: SleepStrategy,
}

impl Policy {
    /// Null on zero-size allocation, logged fatal errors, passive sleep.
    #[must_use]
    pub const fn canonical() -> Self {
        Self {
            zero_size: ZeroSizePolicy::NullOnZero,
            reporting: FatalReporting::Logged,
            sleep: SleepStrategy::Passive,
        }
    }

    /// The mutex-only interface's behavior: non-null on zero, silent fatal errors.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            zero_size: ZeroSizePolicy::NonNullOnZero,
            reporting: FatalReporting::Silent,
            sleep: SleepStrategy::Passive,
        }
    }

    #[must_use]
    pub const fn with_zero_size(mut self, zero_size: ZeroSizePolicy) -> Self {
        self.zero_size = zero_size;
        self
    }

    #[must_use]
    pub const fn with_reporting(mut self, reporting: FatalReporting) -> Self {
        self.reporting = reporting;
        self
    }

    #[must_use]
    pub const fn with_sleep(mut self, sleep: SleepStrategy) -> Self {
        self.sleep = sleep;
        self
    }
}

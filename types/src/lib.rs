//! Core domain types for the OS abstraction layer.
//!
//! This crate contains pure domain types with no IO, no threads, and minimal dependencies.
//! Backends and the config loader both build on it:
//!
//! - **`deadline`**: relative-millisecond to absolute wall-clock conversion
//! - **`policy`**: the configuration profiles (zero-size allocation, fatal reporting, sleep)
//! - **`error`**: the fatal result type and recoverable errors

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod deadline;
mod error;
mod policy;

pub use deadline::{Deadline, MILLIS_PER_SEC, NANOS_PER_MILLI, NANOS_PER_SEC};
pub use error::{Fatal, FatalKind, OsalError};
pub use policy::{FatalReporting, ParsePolicyError, Policy, SleepStrategy, ZeroSizePolicy};

/// Process name used by the launcher when the caller does not supply one.
pub const DEFAULT_PROCESS_NAME: &str = "NewProcess";

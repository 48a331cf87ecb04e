//! Turning a [`Fatal`] into process termination.
//!
//! Backends never exit. They build the fatal result with [`raise`], which logs it when
//! the policy asks for diagnostics, and hand it back. The application decides where the
//! process ends by calling [`escalate`].

use osal_types::{Fatal, FatalKind, FatalReporting};

/// Build a fatal result for `kind`, logging it first under [`FatalReporting::Logged`].
pub fn raise(kind: FatalKind, errno: Option<i32>, reporting: FatalReporting) -> Fatal {
    let fatal = match errno {
        Some(code) => Fatal::os(kind, code),
        None => Fatal::misuse(kind),
    };
    if reporting.is_logged() {
        tracing::error!(kind = %kind, errno = ?errno, "{fatal}");
    }
    fatal
}

/// Terminate the process for `fatal` with its conventional exit status.
pub fn escalate(fatal: Fatal, reporting: FatalReporting) -> ! {
    if reporting.is_logged() {
        tracing::error!(
            kind = %fatal.kind(),
            exit_code = fatal.exit_code(),
            "Cannot continue past a broken OS primitive: {fatal}"
        );
    }
    std::process::exit(fatal.exit_code())
}

/// `result.or_escalate(reporting)` for call sites that have no recovery path.
pub trait EscalateExt<T> {
    fn or_escalate(self, reporting: FatalReporting) -> T;
}

impl<T> EscalateExt<T> for Result<T, Fatal> {
    fn or_escalate(self, reporting: FatalReporting) -> T {
        match self {
            Ok(value) => value,
            Err(fatal) => escalate(fatal, reporting),
        }
    }
}

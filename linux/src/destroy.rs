use std::io;

use osal_types::FatalReporting;

/// Log a failed `*_destroy` from a `Drop` impl, which has no way to return it.
///
/// Follows the same reporting policy as the fatal results the handle returns.
pub(crate) fn report_destroy_failure(call: &str, errno: i32, reporting: FatalReporting) {
    if reporting.is_logged() {
        tracing::error!(
            errno,
            "{call} failed: {}; the process should not continue",
            io::Error::from_raw_os_error(errno)
        );
    }
}

//! Backend built only on `std`.
//!
//! Links on any host the standard library supports. Each contract maps onto the std
//! equivalent: `Mutex` + `Condvar` for both wait primitives, `SystemTime` for the
//! clock, `thread::sleep`, and `std::alloc` with a small size header so `free` needs
//! no length.

mod heap;
mod mutex;
mod platform;
mod semaphore;

pub use mutex::PortableMutex;
pub use platform::PortablePlatform;
pub use semaphore::PortableSemaphore;

use std::time::SystemTime;

use osal_types::Deadline;

pub(crate) fn wall_clock() -> Deadline {
    Deadline::from_system_time(SystemTime::now())
}

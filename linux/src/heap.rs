use std::ptr::NonNull;

use osal_types::ZeroSizePolicy;

pub(crate) fn allocate(size: u32, zero_size: ZeroSizePolicy) -> Option<NonNull<u8>> {
    let bytes = match (size, zero_size) {
        (0, ZeroSizePolicy::NullOnZero) => return None,
        // malloc(0) may legally return null; ask for one byte so the result is freeable.
        (0, ZeroSizePolicy::NonNullOnZero) => 1,
        (size, _) => size as usize,
    };
    // SAFETY: plain malloc; ownership passes to the caller.
    let ptr = NonNull::new(unsafe { libc::malloc(bytes) }.cast::<u8>());
    if ptr.is_none() {
        tracing::debug!(size, "malloc returned null");
    }
    ptr
}

/// # Safety
///
/// `ptr` must come from [`allocate`] and must not have been freed.
pub(crate) unsafe fn free(ptr: Option<NonNull<u8>>) {
    if let Some(ptr) = ptr {
        // SAFETY: guaranteed by the caller.
        unsafe { libc::free(ptr.as_ptr().cast()) };
    }
}

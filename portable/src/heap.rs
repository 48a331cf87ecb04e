//! `std::alloc` behind an allocate/free pair that does not pass the length back.
//!
//! Every block is prefixed with a `HEADER`-byte slot holding its usable size, so
//! `free` can rebuild the `Layout`.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use osal_types::ZeroSizePolicy;

const HEADER: usize = 16;

fn layout_for(bytes: usize) -> Option<Layout> {
    Layout::from_size_align(bytes.checked_add(HEADER)?, HEADER).ok()
}

#[allow(clippy::cast_ptr_alignment)] // the header slot is HEADER-aligned
pub(crate) fn allocate(size: u32, zero_size: ZeroSizePolicy) -> Option<NonNull<u8>> {
    let bytes = match (size, zero_size) {
        (0, ZeroSizePolicy::NullOnZero) => return None,
        (0, ZeroSizePolicy::NonNullOnZero) => 1,
        (size, _) => size as usize,
    };
    let layout = layout_for(bytes)?;
    // SAFETY: `layout` has a non-zero size.
    let Some(base) = NonNull::new(unsafe { alloc::alloc(layout) }) else {
        tracing::debug!(size, "allocator returned null");
        return None;
    };
    // SAFETY: `base` is valid for `HEADER + bytes` bytes and aligned to HEADER.
    unsafe {
        base.as_ptr().cast::<usize>().write(bytes);
        Some(base.add(HEADER))
    }
}

/// # Safety
///
/// `ptr` must come from [`allocate`] and must not have been freed.
#[allow(clippy::cast_ptr_alignment)] // the header slot is HEADER-aligned
pub(crate) unsafe fn free(ptr: Option<NonNull<u8>>) {
    let Some(ptr) = ptr else {
        return;
    };
    // SAFETY: `allocate` handed out `base + HEADER` and wrote the size at `base`.
    unsafe {
        let base = ptr.sub(HEADER);
        let bytes = base.as_ptr().cast::<usize>().read();
        let layout = Layout::from_size_align_unchecked(bytes + HEADER, HEADER);
        alloc::dealloc(base.as_ptr(), layout);
    }
}

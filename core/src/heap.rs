use std::fmt;
use std::ptr::{self, NonNull};
use std::slice;

use crate::Platform;

/// One zero-initialized allocation made through a backend, freed on drop.
///
/// The raw [`Platform::allocate`]/[`Platform::free`] pair stays available for callers
/// that hand memory across an FFI boundary; everyone else should hold one of these.
pub struct HeapBlock<'p, P: Platform> {
    platform: &'p P,
    ptr: NonNull<u8>,
    len: usize,
}

impl<'p, P: Platform> HeapBlock<'p, P> {
    /// Allocate `size` zeroed bytes. `None` on exhaustion, or for `size == 0` under
    /// [`ZeroSizePolicy::NullOnZero`](osal_types::ZeroSizePolicy::NullOnZero).
    pub fn zeroed(platform: &'p P, size: u32) -> Option<Self> {
        let ptr = platform.allocate(size)?;
        let len = size as usize;
        // SAFETY: `allocate` returned at least `len` writable bytes.
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, len) };
        Some(Self { platform, ptr, len })
    }

    #[must_use]
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `len` initialized bytes are owned by this block until drop.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<P: Platform> Drop for HeapBlock<'_, P> {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `allocate` on this platform and is freed exactly once.
        unsafe { self.platform.free(Some(self.ptr)) };
    }
}

impl<P: Platform> fmt::Debug for HeapBlock<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

/*!
 * System Heap Resource
 * Binds the host memory space to the process heap
 */

use super::traits::MemoryResource;
use super::types::{ResourceError, ResourceResult};
use crate::core::limits::DEFAULT_BASE_ALIGNMENT;
use crate::core::types::{Address, Size};
use ahash::RandomState;
use dashmap::DashMap;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Base resource for [`MemorySpace::Host`](super::types::MemorySpace)
///
/// Forwards allocations to the global allocator at a fixed alignment and
/// keeps the layout of every outstanding region, so `deallocate` needs only
/// the pointer. This is a binding to the heap, not an allocator: block
/// carving and free-list management stay below `std::alloc`.
///
/// The resource is expected to live for the rest of the process; regions
/// still outstanding when it drops are intentionally left to the OS.
pub struct SystemHeap {
    alignment: Size,
    outstanding: DashMap<Address, Layout, RandomState>,
    used: AtomicUsize,
}

impl SystemHeap {
    pub fn new() -> Self {
        Self::with_alignment(DEFAULT_BASE_ALIGNMENT)
    }

    /// Create a heap binding with a custom allocation alignment
    ///
    /// The alignment is normalized to a power of two no smaller than the
    /// platform word alignment.
    pub fn with_alignment(alignment: Size) -> Self {
        let alignment = alignment
            .max(std::mem::align_of::<usize>())
            .next_power_of_two();
        Self {
            alignment,
            outstanding: DashMap::with_hasher(RandomState::new()),
            used: AtomicUsize::new(0),
        }
    }

    pub fn alignment(&self) -> Size {
        self.alignment
    }

    /// Number of outstanding regions
    pub fn outstanding_regions(&self) -> usize {
        self.outstanding.len()
    }
}

impl MemoryResource for SystemHeap {
    fn allocate(&self, size: Size) -> ResourceResult<NonNull<u8>> {
        // The global allocator rejects empty layouts; pad to one byte
        let padded = size.max(1);
        let layout = Layout::from_size_align(padded, self.alignment)
            .map_err(|_| ResourceError::HeapRefused { requested: size })?;

        // SAFETY: layout has non-zero size
        let raw = unsafe { alloc(layout) };
        let ptr =
            NonNull::new(raw).ok_or(ResourceError::HeapRefused { requested: size })?;

        self.outstanding.insert(ptr.as_ptr() as Address, layout);
        self.used.fetch_add(layout.size(), Ordering::SeqCst);
        Ok(ptr)
    }

    fn deallocate(&self, ptr: NonNull<u8>) -> ResourceResult<()> {
        let address = ptr.as_ptr() as Address;
        let (_, layout) = self
            .outstanding
            .remove(&address)
            .ok_or(ResourceError::UnknownPointer { address })?;

        // SAFETY: ptr was produced by alloc with this exact layout and has
        // not been freed (the outstanding entry was still present)
        unsafe { dealloc(ptr.as_ptr(), layout) };
        self.used.fetch_sub(layout.size(), Ordering::SeqCst);
        Ok(())
    }

    fn used(&self) -> Size {
        self.used.load(Ordering::SeqCst)
    }
}

impl Default for SystemHeap {
    fn default() -> Self {
        Self::new()
    }
}

/*!
 * Slab Pool
 * Pooled layer charging sub-allocations against a fixed slab budget
 */

use crate::core::types::{Address, Size};
use crate::resource::{MemoryResource, ResourceError, ResourceResult};
use ahash::RandomState;
use dashmap::DashMap;
use log::error;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Charge record for one outstanding pool block
#[derive(Debug, Clone, Copy)]
struct SlabBlock {
    charge: Size,
}

/// Pooled allocator layered over a base resource
///
/// Each request is rounded up to a multiple of the minimum block size and
/// charged against the slab budget before the base resource is asked for
/// the memory; exhaustion of the budget is reported without touching the
/// base. Both parameters are fixed at construction.
pub struct SlabPool {
    base: Arc<dyn MemoryResource>,
    capacity: Size,
    min_block: Size,
    used: AtomicUsize,
    blocks: DashMap<Address, SlabBlock, RandomState>,
}

impl SlabPool {
    pub(crate) fn new(base: Arc<dyn MemoryResource>, capacity: Size, min_block: Size) -> Self {
        Self {
            base,
            capacity,
            min_block,
            used: AtomicUsize::new(0),
            blocks: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Round a request up to a whole number of minimum blocks
    ///
    /// Zero-byte requests still occupy one block; the pool has no smaller
    /// unit to hand out.
    fn charge_for(&self, bytes: Size) -> Size {
        if bytes == 0 {
            return self.min_block;
        }
        // bytes <= capacity here, so the round-up cannot overflow
        bytes.div_ceil(self.min_block) * self.min_block
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    pub fn min_block(&self) -> Size {
        self.min_block
    }

    pub fn available(&self) -> Size {
        self.capacity.saturating_sub(self.used())
    }

    /// Number of outstanding pool blocks
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }
}

impl MemoryResource for SlabPool {
    fn allocate(&self, bytes: Size) -> ResourceResult<NonNull<u8>> {
        // Requests larger than the whole budget never touch the counter
        if bytes > self.capacity {
            let used = self.used.load(Ordering::SeqCst);
            return Err(ResourceError::Exhausted {
                requested: bytes,
                available: self.capacity.saturating_sub(used),
                used,
                total: self.capacity,
            });
        }

        let charge = self.charge_for(bytes);

        // Reserve the charge atomically, reverting on overshoot
        let used = self.used.fetch_add(charge, Ordering::SeqCst);
        if used + charge > self.capacity {
            self.used.fetch_sub(charge, Ordering::SeqCst);
            return Err(ResourceError::Exhausted {
                requested: bytes,
                available: self.capacity.saturating_sub(used),
                used,
                total: self.capacity,
            });
        }

        let ptr = match self.base.allocate(charge) {
            Ok(ptr) => ptr,
            Err(err) => {
                self.used.fetch_sub(charge, Ordering::SeqCst);
                return Err(err);
            }
        };

        self.blocks
            .insert(ptr.as_ptr() as Address, SlabBlock { charge });
        Ok(ptr)
    }

    fn deallocate(&self, ptr: NonNull<u8>) -> ResourceResult<()> {
        let address = ptr.as_ptr() as Address;
        let (_, block) = self
            .blocks
            .remove(&address)
            .ok_or(ResourceError::UnknownPointer { address })?;

        if let Err(err) = self.base.deallocate(ptr) {
            // The base refused a pointer it handed out; restore the record
            // before surfacing the failure
            error!("base resource refused deallocation of 0x{:x}: {}", address, err);
            self.blocks.insert(address, block);
            return Err(err);
        }

        self.used.fetch_sub(block.charge, Ordering::SeqCst);
        Ok(())
    }

    fn capacity(&self) -> Option<Size> {
        Some(self.capacity)
    }

    fn used(&self) -> Size {
        self.used.load(Ordering::SeqCst)
    }
}

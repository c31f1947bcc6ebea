/*!
 * Pool Façade Operations
 * Acquire, release, and provenance queries
 */

use super::provenance::ReleaseClaim;
use super::types::{PoolError, PoolResult, PoolStats};
use super::PooledAllocator;
use crate::core::limits::{CRITICAL_USAGE_RATIO, WARNING_USAGE_RATIO};
use crate::core::types::Address;
use crate::resource::MemoryResource;
use log::{error, info, warn};
use std::ptr::NonNull;
use std::sync::atomic::Ordering;

impl PooledAllocator {
    /// Acquire memory for `count` elements
    ///
    /// Lazily binds to the provider on first use, requests
    /// `count * element_size` bytes from the pooled layer, and registers
    /// the pointer before returning it. The caller owns only the returned
    /// region, for only the size requested.
    ///
    /// A zero-count request is forwarded and still occupies one minimum
    /// block; the returned pointer is distinct and trackable like any
    /// other. Exhaustion of the slab budget is a recoverable failure: the
    /// error carries the requested byte count, nothing is registered, and
    /// no retry happens internally.
    pub fn acquire(&self, count: usize) -> PoolResult<NonNull<u8>> {
        let bytes = count
            .checked_mul(self.config.element_size)
            .ok_or(PoolError::SizeOverflow {
                count,
                element_size: self.config.element_size,
            })?;

        let binding = self
            .binding
            .ensure(&self.manager, &self.config)
            .map_err(|err| {
                error!("pool initialization failed: {}", err);
                err
            })?;

        let ptr = match binding.pool.allocate(bytes) {
            Ok(ptr) => ptr,
            Err(err) => {
                error!("pool: memory allocation of {} bytes failed", bytes);
                return Err(err.into());
            }
        };

        self.live.register(ptr.as_ptr() as Address, bytes)?;
        self.counters.acquires.fetch_add(1, Ordering::SeqCst);

        let used = binding.pool.used();
        let capacity = binding.pool.capacity();
        let ratio = used as f64 / capacity as f64;
        if ratio >= CRITICAL_USAGE_RATIO {
            warn!(
                "pool budget critical: acquired {} bytes at 0x{:x} ({:.1}% used: {} / {})",
                bytes,
                ptr.as_ptr() as Address,
                ratio * 100.0,
                used,
                capacity
            );
        } else if ratio >= WARNING_USAGE_RATIO {
            warn!(
                "pool budget high: acquired {} bytes at 0x{:x} ({:.1}% used: {} / {})",
                bytes,
                ptr.as_ptr() as Address,
                ratio * 100.0,
                used,
                capacity
            );
        } else {
            info!(
                "acquired {} bytes at 0x{:x} ({} elements)",
                bytes,
                ptr.as_ptr() as Address,
                count
            );
        }

        Ok(ptr)
    }

    /// Release a pointer previously returned by [`acquire`](Self::acquire)
    ///
    /// Null is a silent no-op. The provenance tracker is consulted first:
    /// only a pointer tracked as live is forwarded to the pooled layer. A
    /// pointer this pool never issued is rejected as foreign, and a second
    /// release of the same pointer is rejected as already released; in
    /// neither case is the provider touched, since the pool has no way to
    /// free memory it did not allocate.
    pub fn release(&self, ptr: *mut u8) -> PoolResult<()> {
        let Some(ptr) = NonNull::new(ptr) else {
            return Ok(());
        };
        let address = ptr.as_ptr() as Address;

        match self.live.begin_release(address) {
            ReleaseClaim::Unknown => {
                warn!("pointer 0x{:x} was not allocated with the memory pool", address);
                self.counters.rejected_releases.fetch_add(1, Ordering::SeqCst);
                Err(PoolError::ForeignPointer { address })
            }
            ReleaseClaim::AlreadyReleased => {
                warn!(
                    "pointer 0x{:x} was already released back to the memory pool",
                    address
                );
                self.counters.rejected_releases.fetch_add(1, Ordering::SeqCst);
                Err(PoolError::AlreadyReleased { address })
            }
            ReleaseClaim::Claimed { size } => {
                // A live claim implies the binding exists
                let binding = self.binding.ensure(&self.manager, &self.config)?;
                binding.pool.deallocate(ptr).map_err(|err| {
                    error!("pool deallocation of 0x{:x} failed: {}", address, err);
                    PoolError::from(err)
                })?;

                self.counters.releases.fetch_add(1, Ordering::SeqCst);
                info!("released {} bytes at 0x{:x}", size, address);

                if self.live.should_purge() {
                    self.live.purge_released();
                }
                Ok(())
            }
        }
    }

    /// Whether a pointer is a live allocation of this pool
    ///
    /// Null and foreign pointers return false; so does a pointer that has
    /// been released.
    pub fn owns(&self, ptr: *const u8) -> bool {
        if ptr.is_null() {
            return false;
        }
        self.live.contains(ptr as Address)
    }

    /// Snapshot of pool statistics
    ///
    /// Before first use the budget numbers reflect the configured slab
    /// with nothing charged against it.
    pub fn stats(&self) -> PoolStats {
        let (capacity, used) = match self.binding.get() {
            Some(binding) => (binding.pool.capacity(), binding.pool.used()),
            None => (self.config.initial_slab_bytes, 0),
        };
        let usage_percentage = if capacity > 0 {
            (used as f64 / capacity as f64) * 100.0
        } else {
            0.0
        };

        PoolStats {
            capacity_bytes: capacity,
            used_bytes: used,
            available_bytes: capacity.saturating_sub(used),
            usage_percentage,
            live_allocations: self.live.live_len(),
            total_acquires: self.counters.acquires.load(Ordering::SeqCst),
            total_releases: self.counters.releases.load(Ordering::SeqCst),
            rejected_releases: self.counters.rejected_releases.load(Ordering::SeqCst),
            initializations: self.binding.initializations(),
        }
    }
}

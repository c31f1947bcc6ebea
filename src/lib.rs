/*!
 * Pooled Memory Allocator Front-End
 *
 * Serves sub-allocations from a budgeted slab obtained through a
 * memory-resource provider, and tracks the provenance of every outstanding
 * pointer so deallocation and ownership queries are safe.
 *
 * ## Structure
 *
 * - [`resource`]: the provider contract ([`MemoryResource`]), the system
 *   heap binding, and the registry mapping memory spaces to providers
 * - [`pool`]: the [`PooledAllocator`] façade with lazy provider binding,
 *   budget-charged sub-allocation, and live-pointer tracking
 *
 * ## Behavior
 *
 * - Acquire lazily initializes the provider binding exactly once, then
 *   requests `count * element_size` bytes from the pooled layer
 * - Exhaustion of the slab budget is reported as an error, never as a
 *   partially-valid pointer
 * - Release consults the provenance tracker first; foreign and
 *   double-released pointers are rejected with a diagnostic instead of
 *   being forwarded to the provider
 */

pub mod core;
pub mod pool;
pub mod resource;

// Re-exports
pub use pool::{PoolConfig, PoolError, PoolPressure, PoolResult, PoolStats, PooledAllocator};
pub use resource::{MemoryResource, MemorySpace, ResourceError, ResourceManager, SystemHeap};

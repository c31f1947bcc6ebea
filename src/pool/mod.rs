/*!
 * Pool Module
 * Pooled allocation façade with provenance tracking
 */

mod binding;
mod facade;
mod provenance;
mod slab;
pub mod types;

// Re-export for convenience
pub use slab::SlabPool;
pub use types::{PoolConfig, PoolError, PoolPressure, PoolResult, PoolStats};

use crate::core::limits::TOMBSTONE_PURGE_THRESHOLD;
use crate::resource::ResourceManager;
use binding::LazyBinding;
use provenance::LiveSet;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Running operation counters
#[derive(Default)]
struct PoolCounters {
    acquires: AtomicU64,
    releases: AtomicU64,
    rejected_releases: AtomicU64,
}

/// Pooled memory allocator front-end
///
/// The caller-owned context for pooled allocation: it lazily binds to its
/// resource manager on first acquire, serves sub-allocations against the
/// configured slab budget, and tracks the provenance of every outstanding
/// pointer so release and ownership queries are safe. Clones share the
/// same binding, budget, and live set; independent instances share
/// nothing.
///
/// All operations are thread-safe.
pub struct PooledAllocator {
    manager: Arc<ResourceManager>,
    config: PoolConfig,
    binding: Arc<LazyBinding>,
    live: Arc<LiveSet>,
    counters: Arc<PoolCounters>,
}

impl PooledAllocator {
    /// Create an allocator with the default configuration over its own
    /// resource manager
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create an allocator with a custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        Self::with_manager(Arc::new(ResourceManager::new()), config)
    }

    /// Create an allocator over a shared resource manager
    pub fn with_manager(manager: Arc<ResourceManager>, config: PoolConfig) -> Self {
        Self {
            manager,
            config,
            binding: Arc::new(LazyBinding::new()),
            live: Arc::new(LiveSet::new(TOMBSTONE_PURGE_THRESHOLD)),
            counters: Arc::new(PoolCounters::default()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Whether the provider binding has been constructed
    pub fn is_initialized(&self) -> bool {
        self.binding.is_ready()
    }

    /// How many provider-initialization sequences have run (0 before first
    /// acquire, 1 after)
    pub fn initialization_count(&self) -> usize {
        self.binding.initializations()
    }
}

impl Clone for PooledAllocator {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            config: self.config.clone(),
            binding: Arc::clone(&self.binding),
            live: Arc::clone(&self.live),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl Default for PooledAllocator {
    fn default() -> Self {
        Self::new()
    }
}

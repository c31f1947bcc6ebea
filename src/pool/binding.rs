/*!
 * Provider Binding
 * Lazy one-time construction of the resource handles behind the pool
 */

use super::slab::SlabPool;
use super::types::{PoolConfig, PoolResult};
use crate::core::limits::bytes_to_mb;
use crate::resource::ResourceManager;
use log::info;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The fully-constructed provider handles
///
/// The pooled layer keeps the base resource alive; either the whole chain
/// is valid or the binding does not exist. Partial initialization is never
/// observable.
pub(crate) struct PoolBinding {
    pub pool: SlabPool,
}

impl std::fmt::Debug for PoolBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolBinding").finish_non_exhaustive()
    }
}

enum BindingState {
    Uninitialized,
    Ready(Arc<PoolBinding>),
}

/// Lazy initialization state machine
///
/// Two states, one allowed transition (Uninitialized -> Ready), guarded by
/// a mutex so racing first callers serialize and exactly one constructs the
/// binding. A failed construction leaves the state untouched.
pub(crate) struct LazyBinding {
    state: Mutex<BindingState>,
    initializations: AtomicUsize,
}

impl LazyBinding {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BindingState::Uninitialized),
            initializations: AtomicUsize::new(0),
        }
    }

    /// Idempotent setup: construct the binding on first call, reuse it after
    pub fn ensure(
        &self,
        manager: &ResourceManager,
        config: &PoolConfig,
    ) -> PoolResult<Arc<PoolBinding>> {
        let mut state = self.state.lock();
        if let BindingState::Ready(binding) = &*state {
            return Ok(Arc::clone(binding));
        }

        config.validate()?;
        let base = manager.resource(config.memory_space)?;
        let pool = SlabPool::new(base, config.initial_slab_bytes, config.min_block_bytes);
        let binding = Arc::new(PoolBinding { pool });

        *state = BindingState::Ready(Arc::clone(&binding));
        self.initializations.fetch_add(1, Ordering::SeqCst);
        info!(
            "pool bound to {} space: {}MB slab budget, {} byte minimum block",
            config.memory_space,
            bytes_to_mb(config.initial_slab_bytes),
            config.min_block_bytes
        );
        Ok(binding)
    }

    /// The binding if it is already constructed, without initializing
    pub fn get(&self) -> Option<Arc<PoolBinding>> {
        match &*self.state.lock() {
            BindingState::Ready(binding) => Some(Arc::clone(binding)),
            BindingState::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.lock(), BindingState::Ready(_))
    }

    /// How many times the Uninitialized -> Ready transition ran (0 or 1 per
    /// binding; observable as a side channel in tests)
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }
}

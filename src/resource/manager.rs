/*!
 * Resource Manager
 * Registry binding memory spaces to their providers
 */

use super::system::SystemHeap;
use super::traits::MemoryResource;
use super::types::{MemorySpace, ResourceError, ResourceResult};
use ahash::RandomState;
use dashmap::DashMap;
use log::info;
use std::sync::Arc;

/// Registry of memory-resource providers, keyed by memory space
///
/// `Host` is pre-registered with a [`SystemHeap`] binding; unified or
/// device spaces become available once an integrator registers a resource
/// for them. The manager is an explicit object shared by reference, not a
/// hidden process-wide singleton, so independent managers can coexist.
pub struct ResourceManager {
    resources: DashMap<MemorySpace, Arc<dyn MemoryResource>, RandomState>,
}

impl ResourceManager {
    pub fn new() -> Self {
        let manager = Self {
            resources: DashMap::with_hasher(RandomState::new()),
        };
        manager.register(MemorySpace::Host, Arc::new(SystemHeap::new()));
        manager
    }

    /// Create a manager with no pre-registered spaces (useful for testing)
    pub fn empty() -> Self {
        Self {
            resources: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Register (or replace) the resource backing a memory space
    pub fn register(&self, space: MemorySpace, resource: Arc<dyn MemoryResource>) {
        info!("registered resource for {} space", space);
        self.resources.insert(space, resource);
    }

    /// Builder-style registration
    pub fn with_resource(self, space: MemorySpace, resource: Arc<dyn MemoryResource>) -> Self {
        self.register(space, resource);
        self
    }

    /// Look up the resource backing a memory space
    ///
    /// A missing space is a configuration error: the caller cannot proceed
    /// with pooled allocation against it.
    pub fn resource(&self, space: MemorySpace) -> ResourceResult<Arc<dyn MemoryResource>> {
        self.resources
            .get(&space)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ResourceError::SpaceUnavailable(space))
    }

    /// Whether a memory space has a registered resource
    pub fn supports(&self, space: MemorySpace) -> bool {
        self.resources.contains_key(&space)
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

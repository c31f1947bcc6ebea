/*!
 * Resource Types
 * Memory spaces and resource-layer errors
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource operation result
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Resource-layer errors
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("memory space {0} has no registered resource")]
    SpaceUnavailable(MemorySpace),

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("out of memory: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    Exhausted {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("allocation of {requested} bytes was refused by the underlying heap")]
    HeapRefused { requested: usize },

    #[error("pointer 0x{address:x} is not an outstanding allocation of this resource")]
    UnknownPointer { address: usize },
}

/// Logical memory domain a resource is bound to
///
/// `Host` is backed by the process heap out of the box. `Unified` and
/// `Device` have no default backing; an integrator registers a resource for
/// them with the [`ResourceManager`](crate::resource::ResourceManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemorySpace {
    Host,
    Unified,
    Device,
}

impl std::fmt::Display for MemorySpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemorySpace::Host => write!(f, "HOST"),
            MemorySpace::Unified => write!(f, "UM"),
            MemorySpace::Device => write!(f, "DEVICE"),
        }
    }
}

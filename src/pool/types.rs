/*!
 * Pool Types
 * Configuration, statistics, and the pool error taxonomy
 */

use crate::core::limits::{
    CRITICAL_USAGE_RATIO, DEFAULT_ELEMENT_SIZE, DEFAULT_INITIAL_SLAB, DEFAULT_MIN_BLOCK,
    WARNING_USAGE_RATIO,
};
use crate::core::types::{Address, Size};
use crate::resource::{MemorySpace, ResourceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pool operation result
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool errors
///
/// `SpaceUnavailable` and `InvalidConfig` are configuration errors: they
/// surface at first use and mean pooled allocation cannot proceed at all.
/// Everything else is recoverable by the caller.
#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("memory space {0} has no registered resource")]
    SpaceUnavailable(MemorySpace),

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("pool exhausted: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    Exhausted {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("allocation size overflow: {count} elements of {element_size} bytes each")]
    SizeOverflow { count: usize, element_size: usize },

    #[error("pointer 0x{address:x} was not allocated with the memory pool")]
    ForeignPointer { address: Address },

    #[error("pointer 0x{address:x} was already released back to the memory pool")]
    AlreadyReleased { address: Address },

    #[error("provider returned address 0x{address:x} which is still tracked as live")]
    DoubleRegistration { address: Address },

    #[error("memory resource failure: {0}")]
    Provider(String),
}

impl PoolError {
    /// Whether the error is a configuration failure (no safe degraded mode)
    /// rather than a per-request failure the caller can recover from
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PoolError::SpaceUnavailable(_) | PoolError::InvalidConfig(_)
        )
    }
}

impl From<ResourceError> for PoolError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::SpaceUnavailable(space) => PoolError::SpaceUnavailable(space),
            ResourceError::InvalidConfig(reason) => PoolError::InvalidConfig(reason),
            ResourceError::Exhausted {
                requested,
                available,
                used,
                total,
            } => PoolError::Exhausted {
                requested,
                available,
                used,
                total,
            },
            other => PoolError::Provider(other.to_string()),
        }
    }
}

/// Pool configuration
///
/// All parameters are fixed once the pool initializes; changing the config
/// of an already-bound allocator has no effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Slab budget in bytes; the pooled layer never charges beyond this
    pub initial_slab_bytes: Size,
    /// Smallest sub-allocation unit; requests round up to a multiple of it
    pub min_block_bytes: Size,
    /// Which memory space the slab lives in
    pub memory_space: MemorySpace,
    /// Bytes per element for `acquire` count arithmetic
    pub element_size: Size,
}

impl PoolConfig {
    pub fn new() -> Self {
        Self {
            initial_slab_bytes: DEFAULT_INITIAL_SLAB,
            min_block_bytes: DEFAULT_MIN_BLOCK,
            memory_space: MemorySpace::Host,
            element_size: DEFAULT_ELEMENT_SIZE,
        }
    }

    pub fn with_initial_slab(mut self, bytes: Size) -> Self {
        self.initial_slab_bytes = bytes;
        self
    }

    pub fn with_min_block(mut self, bytes: Size) -> Self {
        self.min_block_bytes = bytes;
        self
    }

    pub fn with_memory_space(mut self, space: MemorySpace) -> Self {
        self.memory_space = space;
        self
    }

    pub fn with_element_size(mut self, bytes: Size) -> Self {
        self.element_size = bytes;
        self
    }

    /// Validate the geometry before constructing the pooled layer
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.initial_slab_bytes == 0 {
            return Err(ResourceError::InvalidConfig(
                "initial slab size must be non-zero".into(),
            ));
        }
        if self.min_block_bytes == 0 {
            return Err(ResourceError::InvalidConfig(
                "minimum block size must be non-zero".into(),
            ));
        }
        if self.min_block_bytes > self.initial_slab_bytes {
            return Err(ResourceError::InvalidConfig(format!(
                "minimum block ({} bytes) exceeds the slab budget ({} bytes)",
                self.min_block_bytes, self.initial_slab_bytes
            )));
        }
        if self.element_size == 0 {
            return Err(ResourceError::InvalidConfig(
                "element size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStats {
    pub capacity_bytes: Size,
    pub used_bytes: Size,
    pub available_bytes: Size,
    pub usage_percentage: f64,
    pub live_allocations: usize,
    pub total_acquires: u64,
    pub total_releases: u64,
    pub rejected_releases: u64,
    pub initializations: usize,
}

impl PoolStats {
    pub fn pressure(&self) -> PoolPressure {
        let ratio = self.usage_percentage / 100.0;
        if ratio >= CRITICAL_USAGE_RATIO {
            PoolPressure::Critical
        } else if ratio >= WARNING_USAGE_RATIO {
            PoolPressure::High
        } else if ratio >= 0.60 {
            PoolPressure::Medium
        } else {
            PoolPressure::Low
        }
    }
}

/// Pool budget pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for PoolPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PoolPressure::Low => write!(f, "LOW"),
            PoolPressure::Medium => write!(f, "MEDIUM"),
            PoolPressure::High => write!(f, "HIGH"),
            PoolPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/*!
 * Provenance Tracking
 * Registry of live pool-issued pointers, with released-pointer tombstones
 */

use super::types::{PoolError, PoolResult};
use crate::core::types::{Address, Size};
use ahash::RandomState;
use dashmap::DashMap;
use log::{error, info};
use std::sync::atomic::{AtomicUsize, Ordering};

/// State of a tracked address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerState {
    Live,
    Released,
}

/// Provenance record for one pool-issued address
#[derive(Debug, Clone, Copy)]
struct Provenance {
    size: Size,
    state: PointerState,
}

/// Outcome of atomically claiming an address for release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReleaseClaim {
    /// The address was live; the caller now owns forwarding the deallocation
    Claimed { size: Size },
    /// The address was pool-issued but already released (double release)
    AlreadyReleased,
    /// The address was never issued by this pool
    Unknown,
}

/// Registry of currently-outstanding pool pointers
///
/// An address is live iff it was returned by a successful acquire and has
/// not since been claimed for release. Released addresses are retained as
/// tombstones so a double release is distinguishable from a foreign
/// pointer; tombstones are swept in batches once the purge threshold
/// accumulates.
pub(crate) struct LiveSet {
    entries: DashMap<Address, Provenance, RandomState>,
    live_count: AtomicUsize,
    released_count: AtomicUsize,
    purge_threshold: usize,
}

impl LiveSet {
    pub fn new(purge_threshold: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
            live_count: AtomicUsize::new(0),
            released_count: AtomicUsize::new(0),
            purge_threshold,
        }
    }

    /// Register a freshly issued address
    ///
    /// An address that is still tracked as live indicates the provider
    /// handed out memory it had not reclaimed; this is flagged, and the
    /// tracker is left unchanged. A tombstoned address is ordinary reuse
    /// and is re-registered in place.
    pub fn register(&self, address: Address, size: Size) -> PoolResult<()> {
        match self.entries.entry(address) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                if occupied.get().state == PointerState::Live {
                    error!(
                        "provider returned address 0x{:x} which is still tracked as live",
                        address
                    );
                    return Err(PoolError::DoubleRegistration { address });
                }
                occupied.insert(Provenance {
                    size,
                    state: PointerState::Live,
                });
                self.released_count.fetch_sub(1, Ordering::SeqCst);
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(Provenance {
                    size,
                    state: PointerState::Live,
                });
            }
        }
        self.live_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Atomically claim a live address for release
    ///
    /// Exactly one racing caller observes `Claimed`; the rest see
    /// `AlreadyReleased`, so the provider is never handed the same pointer
    /// twice.
    pub fn begin_release(&self, address: Address) -> ReleaseClaim {
        let claim = match self.entries.get_mut(&address) {
            None => return ReleaseClaim::Unknown,
            Some(mut entry) => {
                let record = entry.value_mut();
                match record.state {
                    PointerState::Released => ReleaseClaim::AlreadyReleased,
                    PointerState::Live => {
                        record.state = PointerState::Released;
                        ReleaseClaim::Claimed { size: record.size }
                    }
                }
            }
        };

        if let ReleaseClaim::Claimed { .. } = claim {
            self.live_count.fetch_sub(1, Ordering::SeqCst);
            self.released_count.fetch_add(1, Ordering::SeqCst);
        }
        claim
    }

    /// Whether an address is currently live
    pub fn contains(&self, address: Address) -> bool {
        // Cheap short-circuit for the common empty-tracker case
        if self.entries.is_empty() {
            return false;
        }
        self.entries
            .get(&address)
            .map_or(false, |entry| entry.value().state == PointerState::Live)
    }

    /// Number of live addresses
    pub fn live_len(&self) -> usize {
        self.live_count.load(Ordering::SeqCst)
    }

    /// Whether enough tombstones accumulated to warrant a sweep
    pub fn should_purge(&self) -> bool {
        self.released_count.load(Ordering::SeqCst) >= self.purge_threshold
    }

    /// Sweep released-pointer tombstones, returning how many were removed
    pub fn purge_released(&self) -> usize {
        let purged = AtomicUsize::new(0);
        self.entries.retain(|_, record| {
            if record.state == PointerState::Released {
                purged.fetch_add(1, Ordering::Relaxed);
                false
            } else {
                true
            }
        });
        let purged = purged.into_inner();
        self.released_count.fetch_sub(purged, Ordering::SeqCst);
        if purged > 0 {
            info!("purged {} released-pointer records", purged);
        }
        purged
    }
}

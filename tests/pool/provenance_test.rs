/*!
 * Provenance Property Tests
 * owns() must track the acquire/release history exactly
 */

use mempool::{PoolConfig, PooledAllocator};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Acquire(usize),
    Release(usize),
    ReleaseStale(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64).prop_map(Op::Acquire),
        any::<usize>().prop_map(Op::Release),
        any::<usize>().prop_map(Op::ReleaseStale),
    ]
}

proptest! {
    /// P1: owns(p) holds iff p came from a successful acquire and has not
    /// since been successfully released; P2: no live address is ever
    /// handed out twice.
    #[test]
    fn prop_owns_tracks_acquire_release_history(
        ops in proptest::collection::vec(op_strategy(), 1..48)
    ) {
        let config = PoolConfig::new()
            .with_initial_slab(256 * 4096)
            .with_min_block(4096);
        let pool = PooledAllocator::with_config(config);

        let mut live: Vec<usize> = Vec::new();
        let mut live_set: HashSet<usize> = HashSet::new();
        let mut stale: Vec<usize> = Vec::new();

        for op in ops {
            match op {
                Op::Acquire(count) => {
                    if let Ok(ptr) = pool.acquire(count) {
                        let address = ptr.as_ptr() as usize;
                        // A live address must never be reissued
                        prop_assert!(live_set.insert(address));
                        live.push(address);
                    }
                }
                Op::Release(seed) => {
                    if !live.is_empty() {
                        let address = live.remove(seed % live.len());
                        live_set.remove(&address);
                        prop_assert!(pool.release(address as *mut u8).is_ok());
                        stale.push(address);
                    }
                }
                Op::ReleaseStale(seed) => {
                    if !stale.is_empty() {
                        let address = stale[seed % stale.len()];
                        // A stale address may have been legitimately reissued
                        // since its release; only releases of genuinely dead
                        // addresses must be rejected
                        if !live_set.contains(&address) {
                            prop_assert!(pool.release(address as *mut u8).is_err());
                        }
                    }
                }
            }

            for address in &live_set {
                prop_assert!(pool.owns(*address as *const u8));
            }
            for address in &stale {
                if !live_set.contains(address) {
                    prop_assert!(!pool.owns(*address as *const u8));
                }
            }
        }

        prop_assert_eq!(pool.stats().live_allocations, live_set.len());

        for address in live {
            prop_assert!(pool.release(address as *mut u8).is_ok());
        }
        prop_assert_eq!(pool.stats().used_bytes, 0);
    }
}

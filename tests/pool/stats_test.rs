/*!
 * Pool Statistics Tests
 * Snapshot coherence, pressure levels, and serialization
 */

use mempool::{PoolConfig, PoolPressure, PoolStats, PooledAllocator};
use pretty_assertions::assert_eq;

fn pool_with_blocks(blocks: usize) -> PooledAllocator {
    PooledAllocator::with_config(
        PoolConfig::new()
            .with_initial_slab(blocks * 4096)
            .with_min_block(4096),
    )
}

#[test]
fn test_stats_before_first_use() {
    let pool = pool_with_blocks(16);
    let stats = pool.stats();

    assert_eq!(stats.capacity_bytes, 16 * 4096);
    assert_eq!(stats.used_bytes, 0);
    assert_eq!(stats.available_bytes, 16 * 4096);
    assert_eq!(stats.live_allocations, 0);
    assert_eq!(stats.initializations, 0);
}

#[test]
fn test_stats_coherence_across_operations() {
    let pool = pool_with_blocks(16);

    let p1 = pool.acquire(512).unwrap();
    let p2 = pool.acquire(512).unwrap();

    let stats = pool.stats();
    assert_eq!(stats.used_bytes + stats.available_bytes, stats.capacity_bytes);
    assert_eq!(stats.used_bytes, 2 * 4096);
    assert_eq!(stats.live_allocations, 2);
    assert_eq!(stats.total_acquires, 2);
    assert_eq!(stats.total_releases, 0);
    assert_eq!(stats.initializations, 1);

    pool.release(p1.as_ptr()).unwrap();
    pool.release(p2.as_ptr()).unwrap();

    let stats = pool.stats();
    assert_eq!(stats.used_bytes, 0);
    assert_eq!(stats.live_allocations, 0);
    assert_eq!(stats.total_releases, 2);
}

#[test]
fn test_rejected_releases_counted() {
    let pool = pool_with_blocks(16);
    let p1 = pool.acquire(10).unwrap();

    pool.release(p1.as_ptr()).unwrap();
    let _ = pool.release(p1.as_ptr());

    let mut foreign = Box::new(0u8);
    let _ = pool.release(&mut *foreign as *mut u8);

    assert_eq!(pool.stats().rejected_releases, 2);
}

#[test]
fn test_pressure_rises_with_usage() {
    let pool = pool_with_blocks(20);
    assert_eq!(pool.stats().pressure(), PoolPressure::Low);

    // 17 of 20 blocks -> 85%
    let mut ptrs = Vec::new();
    for _ in 0..17 {
        ptrs.push(pool.acquire(512).unwrap());
    }
    assert_eq!(pool.stats().pressure(), PoolPressure::High);

    // 20 of 20 blocks -> 100%
    for _ in 0..3 {
        ptrs.push(pool.acquire(512).unwrap());
    }
    assert_eq!(pool.stats().pressure(), PoolPressure::Critical);

    for ptr in ptrs {
        pool.release(ptr.as_ptr()).unwrap();
    }
    assert_eq!(pool.stats().pressure(), PoolPressure::Low);
}

#[test]
fn test_stats_snapshot_serializes() {
    let pool = pool_with_blocks(16);
    let p1 = pool.acquire(512).unwrap();

    let json = serde_json::to_string(&pool.stats()).unwrap();
    let decoded: PoolStats = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.capacity_bytes, 16 * 4096);
    assert_eq!(decoded.used_bytes, 4096);
    assert_eq!(decoded.live_allocations, 1);

    pool.release(p1.as_ptr()).unwrap();
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = PoolConfig::new()
        .with_initial_slab(1024 * 1024)
        .with_min_block(64 * 1024);

    let json = serde_json::to_string(&config).unwrap();
    let decoded: PoolConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.initial_slab_bytes, config.initial_slab_bytes);
    assert_eq!(decoded.min_block_bytes, config.min_block_bytes);
    assert_eq!(decoded.memory_space, config.memory_space);
    assert_eq!(decoded.element_size, config.element_size);
}

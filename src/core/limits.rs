/*!
 * Pool Limits and Constants
 *
 * Centralized location for pool geometry defaults, thresholds, and magic
 * numbers. All values include rationale comments explaining WHY they exist.
 */

// =============================================================================
// POOL GEOMETRY
// =============================================================================

/// Default initial slab budget (512MB)
/// Sizing hint for first-time provider growth; also the fixed capacity the
/// pooled layer charges sub-allocations against
pub const DEFAULT_INITIAL_SLAB: usize = 512 * 1024 * 1024;

/// Default minimum block size (1MB)
/// Smallest unit the pooled layer sub-allocates; requests are rounded up to
/// a multiple of this
pub const DEFAULT_MIN_BLOCK: usize = 1024 * 1024;

/// Default element size (8 bytes)
/// The pool serves numeric arrays of double-precision elements; acquire
/// counts are multiplied by this to get a byte count
pub const DEFAULT_ELEMENT_SIZE: usize = std::mem::size_of::<f64>();

/// Default base-resource alignment (256 bytes)
/// [PERF] Matches the cache-line-multiple alignment used by device-visible
/// heaps; every base allocation is at least this aligned
pub const DEFAULT_BASE_ALIGNMENT: usize = 256;

// =============================================================================
// PROVENANCE TRACKING
// =============================================================================

/// Released-pointer tombstone purge threshold (1000 records)
/// Tombstones make double-release distinguishable from foreign-release;
/// once this many accumulate they are swept in one batch to bound memory
pub const TOMBSTONE_PURGE_THRESHOLD: usize = 1000;

// =============================================================================
// PRESSURE THRESHOLDS
// =============================================================================

/// Warning threshold for pool budget utilization (80%)
pub const WARNING_USAGE_RATIO: f64 = 0.80;

/// Critical threshold for pool budget utilization (95%)
pub const CRITICAL_USAGE_RATIO: f64 = 0.95;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert bytes to megabytes for human-readable output
#[inline]
pub const fn bytes_to_mb(bytes: usize) -> usize {
    bytes / (1024 * 1024)
}

/// Convert megabytes to bytes
#[inline]
pub const fn mb_to_bytes(mb: usize) -> usize {
    mb * 1024 * 1024
}

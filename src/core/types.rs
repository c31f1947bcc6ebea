/*!
 * Core Types
 * Common types used across the crate
 */

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

//! Integration tests for heterogeneous indexing (get/set)
//!
//! Tests verify correctness across:
//! - Scalar indices, slices, index arrays, and boolean masks
//! - Negative indices and steps
//! - Broadcast-aware in-place assignment
//! - Boundary conditions and error reporting

#[path = "index_ops/basic.rs"]
mod basic;

#[path = "index_ops/fancy.rs"]
mod fancy;

#[path = "index_ops/masked.rs"]
mod masked;

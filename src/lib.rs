//! # specr
//!
//! **N-dimensional arrays with NumPy-style indexing and a full FFT suite.**
//!
//! specr provides strided tensors with zero-copy views, heterogeneous
//! read/write indexing (integers, slices, index arrays, boolean masks),
//! and discrete Fourier transforms over any transform length.
//!
//! ## Features
//!
//! - **Tensors**: shape/stride/offset views over shared storage, with
//!   broadcasting, slicing, transposition, and reversal as zero-copy
//!   operations
//! - **Indexing**: `get`/`set` through tuples mixing scalar indices,
//!   strided slices, integer index arrays, and boolean masks, with
//!   broadcast-aware in-place assignment
//! - **FFT**: complex, real, 1-D/2-D/N-D transforms with per-length
//!   algorithm selection (direct, radix-4/2 and mixed-radix Stockham,
//!   Rader, Bluestein), plus `fftshift`/`ifftshift` and frequency helpers
//! - **Dtypes**: f32, f64, i32, i64, u8, bool, and interleaved complex in
//!   both precisions
//!
//! ## Quick Start
//!
//! ```rust
//! use specr::prelude::*;
//!
//! let x = Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]);
//!
//! // Indexing
//! let corner = x.get(&[IndexExpr::Int(0), IndexExpr::Int(1)])?;
//! assert_eq!(corner.item::<f64>()?, 2.0);
//!
//! // FFT round trip
//! let spectrum = specr::fft::fft(&x, None, -1)?;
//! let back = specr::fft::ifft(&spectrum, None, -1)?;
//! # Ok::<(), specr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): parallel batched transforms and shifts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod fft;
pub mod index;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{Complex64, Complex128, DType};
    pub use crate::error::{Error, Result};
    pub use crate::index::{IndexExpr, SliceArg};
    pub use crate::tensor::{Layout, Tensor};
}

//! Frequency reindexing: roll, fftshift/ifftshift, and sample frequencies

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Cyclically rotate `x` along the given axes
///
/// A positive shift moves elements toward higher indices, wrapping at the
/// end; shifts and axes must have the same length. Axes accept negative
/// values and must fall in `[-rank, rank)`.
pub fn roll(x: &Tensor, shifts: &[isize], axes: &[isize]) -> Result<Tensor> {
    if shifts.len() != axes.len() {
        return Err(Error::InvalidArgument {
            arg: "shifts",
            reason: format!(
                "got {} shifts for {} axes",
                shifts.len(),
                axes.len()
            ),
        });
    }

    let ndim = x.ndim();
    let mut per_axis = vec![0usize; ndim];
    for (&shift, &axis) in shifts.iter().zip(axes.iter()) {
        let d = x
            .layout()
            .normalize_dim(axis)
            .ok_or(Error::InvalidDimension { dim: axis, ndim })?;
        let size = x.shape()[d];
        if size > 0 {
            let s = shift.rem_euclid(size as isize) as usize;
            per_axis[d] = (per_axis[d] + s) % size;
        }
    }

    if x.numel() == 0 || ndim == 0 {
        return Ok(x.clone());
    }

    Ok(roll_dense(x, &per_axis))
}

/// Apply per-axis rotations by element copy through a dense buffer
fn roll_dense(x: &Tensor, per_axis: &[usize]) -> Tensor {
    let dense = x.contiguous();
    let out = Tensor::zeros(dense.shape(), dense.dtype());
    let shape = dense.shape().to_vec();
    let ndim = shape.len();
    let elem = dense.dtype().size_in_bytes();

    // Row-major odometer over source indices; the destination index is the
    // source index advanced by the shift on every rolled axis.
    let mut strides = vec![1usize; ndim];
    for d in (0..ndim.saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }

    unsafe {
        let src = dense.storage().as_bytes();
        let dst = out.storage().as_bytes_mut();
        let mut idx = vec![0usize; ndim];
        for s_linear in 0..dense.numel() {
            let mut d_linear = 0usize;
            for d in 0..ndim {
                let j = idx[d] + per_axis[d];
                let j = if j >= shape[d] { j - shape[d] } else { j };
                d_linear += j * strides[d];
            }
            let s = s_linear * elem;
            let t = d_linear * elem;
            dst[t..t + elem].copy_from_slice(&src[s..s + elem]);

            for d in (0..ndim).rev() {
                idx[d] += 1;
                if idx[d] < shape[d] {
                    break;
                }
                idx[d] = 0;
            }
        }
    }

    out
}

/// Move the zero-frequency component to the center of each selected axis
///
/// Rotates axis of length `L` by `floor(L/2)`. Defaults to all axes.
/// Zero-size arrays are returned unchanged.
pub fn fftshift(x: &Tensor, axes: Option<&[isize]>) -> Result<Tensor> {
    shift_impl(x, axes, false)
}

/// Undo [`fftshift`]
///
/// Rotates axis of length `L` by `ceil(L/2)`, so the two shifts invert
/// each other for every even and odd length.
pub fn ifftshift(x: &Tensor, axes: Option<&[isize]>) -> Result<Tensor> {
    shift_impl(x, axes, true)
}

fn shift_impl(x: &Tensor, axes: Option<&[isize]>, inverse: bool) -> Result<Tensor> {
    let ndim = x.ndim();
    let resolved: Vec<isize> = match axes {
        Some(list) => {
            for &axis in list {
                if x.layout().normalize_dim(axis).is_none() {
                    return Err(Error::InvalidDimension { dim: axis, ndim });
                }
            }
            list.to_vec()
        }
        None => (0..ndim as isize).collect(),
    };

    let shifts: Vec<isize> = resolved
        .iter()
        .map(|&axis| {
            let d = x.layout().normalize_dim(axis).expect("validated axis");
            let size = x.shape()[d] as isize;
            if inverse {
                size - size / 2
            } else {
                size / 2
            }
        })
        .collect();

    roll(x, &shifts, &resolved)
}

/// Sample frequencies for an `n`-point transform with spacing `d`
///
/// Returns `[0, 1, ..., ceil(n/2)-1, -floor(n/2), ..., -1] / (d*n)`.
pub fn fftfreq(n: usize, d: f64, dtype: DType) -> Result<Tensor> {
    if n == 0 {
        return Err(Error::InvalidArgument {
            arg: "n",
            reason: "n must be positive".to_string(),
        });
    }
    if !dtype.is_float() {
        return Err(Error::UnsupportedDType {
            dtype,
            op: "fftfreq",
        });
    }

    let scale = 1.0 / (d * n as f64);
    let values: Vec<f64> = (0..n)
        .map(|i| {
            let freq = if i < n.div_ceil(2) {
                i as f64
            } else {
                i as f64 - n as f64
            };
            freq * scale
        })
        .collect();

    freq_tensor(&values, dtype)
}

/// Non-negative sample frequencies for an `n`-point real transform
///
/// Returns `[0, 1, ..., n/2] / (d*n)`, matching the `rfft` output length.
pub fn rfftfreq(n: usize, d: f64, dtype: DType) -> Result<Tensor> {
    if n == 0 {
        return Err(Error::InvalidArgument {
            arg: "n",
            reason: "n must be positive".to_string(),
        });
    }
    if !dtype.is_float() {
        return Err(Error::UnsupportedDType {
            dtype,
            op: "rfftfreq",
        });
    }

    let scale = 1.0 / (d * n as f64);
    let values: Vec<f64> = (0..n / 2 + 1).map(|i| i as f64 * scale).collect();
    freq_tensor(&values, dtype)
}

fn freq_tensor(values: &[f64], dtype: DType) -> Result<Tensor> {
    match dtype {
        DType::F64 => Tensor::try_from_slice(values, &[values.len()]),
        DType::F32 => {
            let narrowed: Vec<f32> = values.iter().map(|&v| v as f32).collect();
            Tensor::try_from_slice(&narrowed, &[narrowed.len()])
        }
        _ => Err(Error::UnsupportedDType {
            dtype,
            op: "fftfreq",
        }),
    }
}

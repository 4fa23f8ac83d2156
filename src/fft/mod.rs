//! Fast Fourier transforms over tensors
//!
//! The public surface mirrors `numpy.fft`: complex transforms ([`fft`],
//! [`ifft`]), real transforms ([`rfft`], [`irfft`]), their 2-D and N-D
//! compositions, and the frequency reindexing helpers ([`fftshift`],
//! [`ifftshift`], [`fftfreq`], [`rfftfreq`], [`roll`]).
//!
//! Every transform accepts an optional target length `n` (`s` per axis for
//! the N-D forms): shorter inputs are zero-padded at the end, longer inputs
//! truncated. The forward transform uses the negative-exponent convention;
//! the inverse uses the positive exponent and divides by the length, so
//! `ifft(fft(x)) == x`.
//!
//! Inputs of any dtype and any layout are accepted: integer and real
//! inputs promote to complex, and arbitrarily strided, reversed, or
//! broadcast views are materialized internally, so results never depend on
//! the input's contiguity. Outputs are always dense, so transforms chain
//! freely.

mod kernels;
mod plan;
mod real;
mod shift;

pub use plan::{plan_for, FftPlan, FftStrategy, MAX_RADIX};
pub use shift::{fftfreq, fftshift, ifftshift, rfftfreq, roll};

use crate::dtype::{Complex64, Complex128, ComplexScalar, DType};
use crate::error::{Error, Result};
use crate::tensor::Tensor;
use kernels::transform;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Direction of a complex transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Negative-exponent transform, unscaled
    Forward,
    /// Positive-exponent transform, scaled by 1/n
    Inverse,
}

// ============================================================================
// 1-D transforms
// ============================================================================

/// Complex-to-complex FFT along `axis` (default last, negative allowed)
pub fn fft(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    c2c_axis(x, n, axis, Direction::Forward)
}

/// Inverse complex-to-complex FFT along `axis`, scaled by 1/n
pub fn ifft(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    c2c_axis(x, n, axis, Direction::Inverse)
}

/// Real-to-complex FFT along `axis`
///
/// Output length along the axis is `n/2 + 1`, exploiting conjugate
/// symmetry. Complex input is rejected.
pub fn rfft(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    r2c_axis(x, n, axis)
}

/// Complex-to-real inverse FFT along `axis`
///
/// The input is taken as the conjugate-symmetric half spectrum of a real
/// signal of length `n` (default `2*(input_len - 1)`); the output is real.
pub fn irfft(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    c2r_axis(x, n, axis)
}

// ============================================================================
// 2-D and N-D transforms
// ============================================================================

/// 2-D FFT over `axes` (default the last two)
pub fn fft2(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    fftn(x, s, Some(axes.unwrap_or(&[-2, -1])))
}

/// Inverse 2-D FFT over `axes` (default the last two)
pub fn ifft2(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    ifftn(x, s, Some(axes.unwrap_or(&[-2, -1])))
}

/// 2-D real FFT over `axes` (default the last two)
pub fn rfft2(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    rfftn(x, s, Some(axes.unwrap_or(&[-2, -1])))
}

/// Inverse 2-D real FFT over `axes` (default the last two)
pub fn irfft2(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    irfftn(x, s, Some(axes.unwrap_or(&[-2, -1])))
}

/// N-D FFT: 1-D transforms applied over each axis in `axes`
///
/// Defaults to all axes, or the last `s.len()` axes when only `s` is
/// given. Axes are processed last-to-first so per-axis `s` entries
/// truncate or pad exactly the axis they name.
pub fn fftn(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    nd_c2c(x, s, axes, Direction::Forward)
}

/// Inverse N-D FFT, scaled by the product of the transform lengths
pub fn ifftn(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    nd_c2c(x, s, axes, Direction::Inverse)
}

/// N-D real FFT: real transform along the last axis in `axes`, complex
/// transforms over the rest
pub fn rfftn(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    let (s, ax) = cook_nd_args(x, s, axes, false)?;
    let Some((&last, rest)) = ax.split_last() else {
        return Err(no_axes_error());
    };
    let mut cur = r2c_axis(x, Some(s[rest.len()]), last)?;
    for (ii, &axis) in rest.iter().enumerate() {
        cur = c2c_axis(&cur, Some(s[ii]), axis, Direction::Forward)?;
    }
    Ok(cur)
}

/// Inverse N-D real FFT: complex inverses over the leading axes, then a
/// real inverse reconstructing the last-transformed axis from its half
/// spectrum
pub fn irfftn(x: &Tensor, s: Option<&[usize]>, axes: Option<&[isize]>) -> Result<Tensor> {
    let (s, ax) = cook_nd_args(x, s, axes, true)?;
    let Some((&last, rest)) = ax.split_last() else {
        return Err(no_axes_error());
    };
    let mut cur = x.clone();
    for (ii, &axis) in rest.iter().enumerate() {
        cur = c2c_axis(&cur, Some(s[ii]), axis, Direction::Inverse)?;
    }
    c2r_axis(&cur, Some(s[rest.len()]), last)
}

// ============================================================================
// Axis resolution and row dispatch
// ============================================================================

fn no_axes_error() -> Error {
    Error::InvalidArgument {
        arg: "axes",
        reason: "no axes to transform".to_string(),
    }
}

fn normalize_axis(x: &Tensor, axis: isize) -> Result<usize> {
    x.layout()
        .normalize_dim(axis)
        .ok_or(Error::InvalidDimension {
            dim: axis,
            ndim: x.ndim(),
        })
}

fn resolve_len(n: Option<usize>, in_len: usize) -> Result<usize> {
    let n = n.unwrap_or(in_len);
    if n == 0 {
        return Err(Error::InvalidArgument {
            arg: "n",
            reason: "transform length must be positive".to_string(),
        });
    }
    Ok(n)
}

/// The compute dtype for a given input: f32-class inputs stay in single
/// precision, everything else (f64, integers, bool) widens to double.
fn complex_dtype_for(dtype: DType) -> DType {
    match dtype {
        DType::F32 | DType::Complex64 => DType::Complex64,
        _ => DType::Complex128,
    }
}

/// Resolve `s` and `axes` defaults for the N-D entry points
///
/// With neither given, all axes transform at their input sizes. With only
/// `s`, the last `s.len()` axes are used. For the inverse real forms the
/// default length of the final axis is `2*(input_len - 1)`.
fn cook_nd_args(
    x: &Tensor,
    s: Option<&[usize]>,
    axes: Option<&[isize]>,
    invreal: bool,
) -> Result<(Vec<usize>, Vec<isize>)> {
    let ndim = x.ndim() as isize;
    let ax: Vec<isize> = match axes {
        Some(a) => a.to_vec(),
        None => match s {
            Some(s) => (ndim - s.len() as isize..ndim).collect(),
            None => (0..ndim).collect(),
        },
    };

    let lengths: Vec<usize> = match s {
        Some(s) => {
            if s.len() != ax.len() {
                return Err(Error::InvalidArgument {
                    arg: "s",
                    reason: "s and axes must have the same length".to_string(),
                });
            }
            s.to_vec()
        }
        None => {
            let mut lengths = Vec::with_capacity(ax.len());
            for &a in &ax {
                lengths.push(x.shape()[normalize_axis(x, a)?]);
            }
            if invreal {
                match lengths.last_mut() {
                    Some(last) => *last = 2 * last.saturating_sub(1),
                    None => return Err(no_axes_error()),
                }
            }
            lengths
        }
    };

    // Guard against explicit zero lengths before the per-axis calls
    if s.is_some() && lengths.iter().any(|&n| n == 0) {
        return Err(Error::InvalidArgument {
            arg: "s",
            reason: "transform lengths must be positive".to_string(),
        });
    }

    Ok((lengths, ax))
}

fn nd_c2c(
    x: &Tensor,
    s: Option<&[usize]>,
    axes: Option<&[isize]>,
    dir: Direction,
) -> Result<Tensor> {
    let (s, ax) = cook_nd_args(x, s, axes, false)?;
    if ax.is_empty() {
        return x.astype(complex_dtype_for(x.dtype()));
    }
    let mut cur = c2c_axis(x, Some(s[ax.len() - 1]), ax[ax.len() - 1], dir)?;
    for ii in (0..ax.len() - 1).rev() {
        cur = c2c_axis(&cur, Some(s[ii]), ax[ii], dir)?;
    }
    Ok(cur)
}

/// Complex-to-complex transform along one axis
fn c2c_axis(x: &Tensor, n: Option<usize>, axis: isize, dir: Direction) -> Result<Tensor> {
    if x.ndim() == 0 {
        return Err(Error::InvalidArgument {
            arg: "x",
            reason: "fft requires at least one dimension".to_string(),
        });
    }
    let d = normalize_axis(x, axis)?;
    let in_len = x.shape()[d];
    let cdtype = complex_dtype_for(x.dtype());

    // A zero-size array with no explicit length is passed through.
    if x.numel() == 0 && n.is_none() {
        return x.astype(cdtype);
    }
    let n = resolve_len(n, in_len)?;

    let ndim = x.ndim();
    let mut perm: Vec<usize> = (0..ndim).collect();
    perm.swap(d, ndim - 1);

    let rows = x.permute(&perm)?.astype(cdtype)?;
    let batch: usize = rows.shape()[..ndim - 1].iter().product();

    let mut out_shape = rows.shape().to_vec();
    out_shape[ndim - 1] = n;
    let out = Tensor::try_zeros(&out_shape, cdtype)?;

    match cdtype {
        DType::Complex64 => c2c_rows::<Complex64>(&rows, &out, in_len, n, batch, dir),
        _ => c2c_rows::<Complex128>(&rows, &out, in_len, n, batch, dir),
    }

    out.permute(&perm)
}

fn c2c_rows<C: ComplexScalar>(
    input: &Tensor,
    output: &Tensor,
    in_len: usize,
    n: usize,
    batch: usize,
    dir: Direction,
) {
    let sign = match dir {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };
    let scale = match dir {
        Direction::Forward => 1.0,
        Direction::Inverse => 1.0 / n as f64,
    };
    let copy = in_len.min(n);

    let src = unsafe { input.storage().as_slice::<C>() };
    let dst = unsafe { output.storage().as_mut_slice::<C>() };

    let run_row = |b: usize, chunk: &mut [C]| {
        let s = b * in_len;
        chunk[..copy].copy_from_slice(&src[s..s + copy]);
        transform(chunk, sign);
        if scale != 1.0 {
            for v in chunk.iter_mut() {
                *v = v.scale(scale);
            }
        }
    };

    #[cfg(feature = "rayon")]
    if batch > 1 {
        dst.par_chunks_mut(n)
            .enumerate()
            .for_each(|(b, chunk)| run_row(b, chunk));
        return;
    }

    let _ = batch;
    for (b, chunk) in dst.chunks_mut(n).enumerate() {
        run_row(b, chunk);
    }
}

/// Real-to-complex transform along one axis
fn r2c_axis(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    if x.ndim() == 0 {
        return Err(Error::InvalidArgument {
            arg: "x",
            reason: "rfft requires at least one dimension".to_string(),
        });
    }
    if x.dtype().is_complex() {
        return Err(Error::UnsupportedDType {
            dtype: x.dtype(),
            op: "rfft",
        });
    }
    let d = normalize_axis(x, axis)?;
    let in_len = x.shape()[d];
    let n = resolve_len(n, in_len)?;
    let h = n / 2 + 1;

    let cdtype = if x.dtype() == DType::F32 {
        DType::Complex64
    } else {
        DType::Complex128
    };

    let ndim = x.ndim();
    let mut perm: Vec<usize> = (0..ndim).collect();
    perm.swap(d, ndim - 1);

    let rows = x.permute(&perm)?.astype(DType::F64)?;
    let batch: usize = rows.shape()[..ndim - 1].iter().product();

    let mut out_shape = rows.shape().to_vec();
    out_shape[ndim - 1] = h;
    let out = Tensor::try_zeros(&out_shape, cdtype)?;

    match cdtype {
        DType::Complex64 => r2c_rows::<Complex64>(&rows, &out, in_len, n, batch),
        _ => r2c_rows::<Complex128>(&rows, &out, in_len, n, batch),
    }

    out.permute(&perm)
}

fn r2c_rows<C: ComplexScalar>(
    input: &Tensor,
    output: &Tensor,
    in_len: usize,
    n: usize,
    batch: usize,
) {
    let h = n / 2 + 1;
    let copy = in_len.min(n);
    let src = unsafe { input.storage().as_slice::<f64>() };
    let dst = unsafe { output.storage().as_mut_slice::<C>() };

    let run_row = |b: usize, chunk: &mut [C]| {
        let mut signal = vec![0.0f64; n];
        let s = b * in_len;
        signal[..copy].copy_from_slice(&src[s..s + copy]);
        real::rfft_row(&signal, chunk);
    };

    #[cfg(feature = "rayon")]
    if batch > 1 {
        dst.par_chunks_mut(h)
            .enumerate()
            .for_each(|(b, chunk)| run_row(b, chunk));
        return;
    }

    let _ = batch;
    for (b, chunk) in dst.chunks_mut(h).enumerate() {
        run_row(b, chunk);
    }
}

/// Complex-to-real inverse transform along one axis
fn c2r_axis(x: &Tensor, n: Option<usize>, axis: isize) -> Result<Tensor> {
    if x.ndim() == 0 {
        return Err(Error::InvalidArgument {
            arg: "x",
            reason: "irfft requires at least one dimension".to_string(),
        });
    }
    let d = normalize_axis(x, axis)?;
    let in_len = x.shape()[d];
    let n = match n {
        Some(v) => resolve_len(Some(v), in_len)?,
        None => resolve_len(Some(2 * in_len.saturating_sub(1)), in_len)?,
    };
    let h = n / 2 + 1;

    let cdtype = complex_dtype_for(x.dtype());
    let out_dtype = if cdtype == DType::Complex64 {
        DType::F32
    } else {
        DType::F64
    };

    let ndim = x.ndim();
    let mut perm: Vec<usize> = (0..ndim).collect();
    perm.swap(d, ndim - 1);

    // Compute in double precision regardless of class; the result narrows
    // at the end for f32-class inputs.
    let rows = x.permute(&perm)?.astype(DType::Complex128)?;
    let batch: usize = rows.shape()[..ndim - 1].iter().product();

    let mut out_shape = rows.shape().to_vec();
    out_shape[ndim - 1] = n;
    let out = Tensor::try_zeros(&out_shape, DType::F64)?;

    c2r_rows(&rows, &out, in_len, n, h, batch);

    let out = out.permute(&perm)?;
    if out_dtype == DType::F64 {
        Ok(out)
    } else {
        out.astype(out_dtype)
    }
}

fn c2r_rows(
    input: &Tensor,
    output: &Tensor,
    in_len: usize,
    n: usize,
    h: usize,
    batch: usize,
) {
    let copy = in_len.min(h);
    let src = unsafe { input.storage().as_slice::<Complex128>() };
    let dst = unsafe { output.storage().as_mut_slice::<f64>() };

    let run_row = |b: usize, chunk: &mut [f64]| {
        let mut spectrum = vec![Complex128::ZERO; h];
        let s = b * in_len;
        spectrum[..copy].copy_from_slice(&src[s..s + copy]);
        real::irfft_row(&spectrum, chunk);
    };

    #[cfg(feature = "rayon")]
    if batch > 1 {
        dst.par_chunks_mut(n)
            .enumerate()
            .for_each(|(b, chunk)| run_row(b, chunk));
        return;
    }

    let _ = batch;
    for (b, chunk) in dst.chunks_mut(n).enumerate() {
        run_row(b, chunk);
    }
}

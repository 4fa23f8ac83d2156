//! FFT kernels: direct, mixed-radix Stockham, Rader, and Bluestein
//!
//! All kernels operate in place on one row, are unnormalized, and take the
//! exponent sign explicitly (-1 forward, +1 inverse); the caller applies
//! 1/n after an inverse transform. Kernels are generic over
//! [`ComplexScalar`] so the same code serves both precisions.
//!
//! # Algorithm: mixed-radix Stockham autosort
//!
//! ```text
//! stage(n, s):                        // n*s == N at every level
//!     r = leading radix, m = n/r
//!     for p in 0..m:
//!         for q in 0..s:
//!             for u in 0..r:
//!                 t = Σ_i x[q + s*(p + m*i)] * w_r^(i*u)
//!                 y[q + s*(r*p + u)] = t * w_n^(p*u)
//!     recurse(m, s*r) with x and y swapped
//! ```
//!
//! The output lands in natural order with no bit-reversal pass; buffers
//! double between stages.

use super::plan::{plan_for, FftStrategy};
use crate::dtype::ComplexScalar;
use std::f64::consts::PI;

/// Transform one row in place (unnormalized)
///
/// `sign` is -1.0 for the forward transform, +1.0 for the inverse.
pub fn transform<C: ComplexScalar>(data: &mut [C], sign: f64) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    let plan = plan_for(n);
    match &plan.strategy {
        FftStrategy::Direct => dft_direct(data, sign),
        FftStrategy::Stockham(factors) => stockham(data, factors, sign),
        FftStrategy::Rader { root, root_inv } => rader(data, *root, *root_inv, sign),
        FftStrategy::Bluestein => bluestein(data, sign),
    }
}

/// Twiddle table: w[k] = e^(sign * 2πi * k / n) for k in 0..n
fn twiddle_table<C: ComplexScalar>(n: usize, sign: f64) -> Vec<C> {
    let step = sign * 2.0 * PI / n as f64;
    (0..n).map(|k| C::cis(step * k as f64)).collect()
}

/// Explicit DFT for small lengths
fn dft_direct<C: ComplexScalar>(data: &mut [C], sign: f64) {
    let n = data.len();
    let w = twiddle_table::<C>(n, sign);
    let mut out = vec![C::ZERO; n];
    for (k, slot) in out.iter_mut().enumerate() {
        let mut acc = C::ZERO;
        for (j, &x) in data.iter().enumerate() {
            acc = acc + x * w[(j * k) % n];
        }
        *slot = acc;
    }
    data.copy_from_slice(&out);
}

/// Mixed-radix Stockham autosort FFT
///
/// `factors` is the radix sequence from the plan; its product equals
/// `data.len()`.
fn stockham<C: ComplexScalar>(data: &mut [C], factors: &[usize], sign: f64) {
    let n = data.len();
    debug_assert_eq!(factors.iter().product::<usize>(), n);
    let mut work = vec![C::ZERO; n];
    stockham_rec(n, 1, false, data, &mut work, factors, sign);
}

/// One decimation-in-frequency stage, then recurse with buffers swapped
///
/// `x` and `y` always hold the full row (`n * s` elements). The `eo` flag
/// tracks which buffer the caller expects the result in; the base case
/// copies once if the stage count was odd.
fn stockham_rec<C: ComplexScalar>(
    n: usize,
    s: usize,
    eo: bool,
    x: &mut [C],
    y: &mut [C],
    factors: &[usize],
    sign: f64,
) {
    if n == 1 {
        if eo {
            y[..s].copy_from_slice(&x[..s]);
        }
        return;
    }

    let r = factors[0];
    let m = n / r;
    // w_n^(p*u) with p*u < n, and the r-point DFT's own twiddles
    let wn = twiddle_table::<C>(n, sign);
    let wr = twiddle_table::<C>(r, sign);

    for p in 0..m {
        for q in 0..s {
            for u in 0..r {
                let mut t = C::ZERO;
                for i in 0..r {
                    t = t + x[q + s * (p + m * i)] * wr[(i * u) % r];
                }
                y[q + s * (r * p + u)] = t * wn[p * u];
            }
        }
    }

    stockham_rec(m, s * r, !eo, y, x, &factors[1..], sign);
}

/// Rader's algorithm for a prime length `p`
///
/// Reorders the input by powers of a primitive root `g`, turning the DFT
/// into a cyclic convolution of length `p - 1`, which is composite and
/// handled by the other kernels.
fn rader<C: ComplexScalar>(data: &mut [C], g: usize, g_inv: usize, sign: f64) {
    let p = data.len();
    let len = p - 1;
    let step = sign * 2.0 * PI / p as f64;

    let x0 = data[0];
    let mut total = C::ZERO;
    for &v in data.iter() {
        total = total + v;
    }

    // a[q] = x[g^q mod p], b[q] = e^(sign*2πi*(g^-q mod p)/p)
    let mut a = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);
    let mut gq = 1usize;
    let mut giq = 1usize;
    for _ in 0..len {
        a.push(data[gq]);
        b.push(C::cis(step * giq as f64));
        gq = gq * g % p;
        giq = giq * g_inv % p;
    }

    // Cyclic convolution c = a ⊛ b through length p-1 transforms
    transform(&mut a, -1.0);
    transform(&mut b, -1.0);
    for (av, bv) in a.iter_mut().zip(b.iter()) {
        *av = *av * *bv;
    }
    transform(&mut a, 1.0);
    let scale = 1.0 / len as f64;

    // X[g^-m mod p] = x[0] + c[m]; X[0] is the plain sum
    data[0] = total;
    let mut gim = 1usize;
    for c in a.iter().take(len) {
        data[gim] = x0 + c.scale(scale);
        gim = gim * g_inv % p;
    }
}

/// Bluestein's chirp-z algorithm for arbitrary lengths
///
/// Turns the DFT into a linear convolution against a chirp, computed with
/// a power-of-two transform of size >= 2n-1. The chirp exponent is reduced
/// modulo 2n before the angle is formed, which keeps k² exact for any
/// practical n.
fn bluestein<C: ComplexScalar>(data: &mut [C], sign: f64) {
    let n = data.len();
    let m = (2 * n - 1).next_power_of_two();

    let chirp: Vec<C> = (0..n)
        .map(|k| {
            let e = ((k as u128 * k as u128) % (2 * n as u128)) as f64;
            C::cis(sign * PI * e / n as f64)
        })
        .collect();

    let mut a = vec![C::ZERO; m];
    for (k, slot) in a.iter_mut().enumerate().take(n) {
        *slot = data[k] * chirp[k];
    }

    let mut b = vec![C::ZERO; m];
    b[0] = chirp[0].conj();
    for k in 1..n {
        let v = chirp[k].conj();
        b[k] = v;
        b[m - k] = v;
    }

    transform(&mut a, -1.0);
    transform(&mut b, -1.0);
    for (av, bv) in a.iter_mut().zip(b.iter()) {
        *av = *av * *bv;
    }
    transform(&mut a, 1.0);
    let scale = 1.0 / m as f64;

    for (k, out) in data.iter_mut().enumerate() {
        *out = chirp[k] * a[k].scale(scale);
    }
}

//! Real-transform row kernels: half-spectrum packing and reconstruction

use super::kernels::transform;
use crate::dtype::ComplexScalar;
use std::f64::consts::PI;

/// Real-to-complex FFT of one row
///
/// `input` holds the already truncated/padded signal of length `n`;
/// `out` receives the non-redundant half spectrum of length `n/2 + 1`.
///
/// Even lengths use the packing trick: the n real values become n/2
/// complex values `z[k] = x[2k] + i*x[2k+1]`, one half-size transform
/// runs, and the result unpacks through the conjugate-symmetry identities.
/// Odd lengths run a full complex transform and keep the first half.
pub(super) fn rfft_row<C: ComplexScalar>(input: &[f64], out: &mut [C]) {
    let n = input.len();
    debug_assert_eq!(out.len(), n / 2 + 1);

    if n < 2 || n % 2 != 0 {
        let mut full: Vec<C> = input
            .iter()
            .map(|&v| C::from_f64_parts(v, 0.0))
            .collect();
        transform(&mut full, -1.0);
        out.copy_from_slice(&full[..n / 2 + 1]);
        return;
    }

    let half = n / 2;
    let mut packed: Vec<C> = (0..half)
        .map(|k| C::from_f64_parts(input[2 * k], input[2 * k + 1]))
        .collect();
    transform(&mut packed, -1.0);

    // X[0] and X[n/2] come straight from the DC bin of the packed
    // transform; the rest splits into even/odd parts recombined with a
    // twiddle.
    let z0 = packed[0];
    out[0] = C::from_f64_parts(z0.re_f64() + z0.im_f64(), 0.0);
    out[half] = C::from_f64_parts(z0.re_f64() - z0.im_f64(), 0.0);

    for k in 1..half {
        let z_k = packed[k];
        let z_nk = packed[half - k].conj();

        let x_even = (z_k + z_nk).scale(0.5);
        let x_odd = (z_k - z_nk) * C::from_f64_parts(0.0, -0.5);

        let twiddle = C::cis(-2.0 * PI * k as f64 / n as f64);
        out[k] = x_even + x_odd * twiddle;
    }
}

/// Complex-to-real inverse FFT of one row (unnormalized input convention,
/// output scaled by 1/n)
///
/// `input` holds the already truncated/padded half spectrum of length
/// `n/2 + 1` for an output of length `n`. The full spectrum is rebuilt
/// from conjugate symmetry, inverse transformed, and the real parts kept.
pub(super) fn irfft_row<C: ComplexScalar>(input: &[C], out: &mut [f64]) {
    let n = out.len();
    debug_assert_eq!(input.len(), n / 2 + 1);

    let mut full = vec![C::ZERO; n];
    full[..input.len().min(n)].copy_from_slice(&input[..input.len().min(n)]);
    for k in 1..(n - n / 2) {
        full[n - k] = input[k].conj();
    }

    transform(&mut full, 1.0);
    let scale = 1.0 / n as f64;
    for (o, z) in out.iter_mut().zip(full.iter()) {
        *o = z.re_f64() * scale;
    }
}

//! Shared helpers for integration tests: reference DFT and comparisons
#![allow(dead_code)] // each test binary uses a subset of these helpers

use specr::dtype::Complex128;

/// Textbook O(n²) DFT in double precision
///
/// Forward uses the negative exponent; inverse uses the positive exponent
/// and divides by n, matching the library's convention.
pub fn naive_dft(input: &[Complex128], inverse: bool) -> Vec<Complex128> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }
    let sign = if inverse { 1.0 } else { -1.0 };
    let scale = if inverse { 1.0 / n as f64 } else { 1.0 };
    (0..n)
        .map(|k| {
            let mut acc = Complex128::ZERO;
            for (j, &x) in input.iter().enumerate() {
                let theta = sign * 2.0 * std::f64::consts::PI * (j as f64) * (k as f64) / n as f64;
                acc = acc + x * Complex128::from_polar(1.0, theta);
            }
            Complex128::new(acc.re * scale, acc.im * scale)
        })
        .collect()
}

/// Reference half-spectrum DFT of a real signal
pub fn naive_rdft(input: &[f64]) -> Vec<Complex128> {
    let full: Vec<Complex128> = input.iter().map(|&v| Complex128::new(v, 0.0)).collect();
    let mut out = naive_dft(&full, false);
    out.truncate(input.len() / 2 + 1);
    out
}

/// Deterministic aperiodic complex test signal
pub fn signal(n: usize) -> Vec<Complex128> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Complex128::new(
                (0.37 * t).sin() + 0.2 * (0.11 * t).cos(),
                (0.53 * t).cos() - 0.1 * (0.23 * t).sin(),
            )
        })
        .collect()
}

/// Deterministic real test signal
pub fn real_signal(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            (0.41 * t).sin() + 0.3 * (0.07 * t).cos() - 0.15
        })
        .collect()
}

/// Assert complex sequences agree within `atol + rtol * |expected|`
#[track_caller]
pub fn assert_allclose_c(actual: &[Complex128], expected: &[Complex128], atol: f64, rtol: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: {} vs {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (*a - *e).magnitude();
        let bound = atol + rtol * e.magnitude();
        assert!(
            err <= bound,
            "element {}: |{} - {}| = {} exceeds {}",
            i,
            a,
            e,
            err,
            bound
        );
    }
}

/// Assert real sequences agree within `atol + rtol * |expected|`
#[track_caller]
pub fn assert_allclose_f(actual: &[f64], expected: &[f64], atol: f64, rtol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let err = (a - e).abs();
        let bound = atol + rtol * e.abs();
        assert!(
            err <= bound,
            "element {}: |{} - {}| = {} exceeds {}",
            i,
            a,
            e,
            err,
            bound
        );
    }
}

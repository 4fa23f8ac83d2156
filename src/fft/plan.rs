//! Per-length FFT strategy selection
//!
//! A plan maps a transform length to the kernel that computes it: tiny
//! lengths go through the direct kernel, smooth composites through the
//! mixed-radix Stockham kernel, large primes through Rader's reduction to
//! a length `n-1` convolution, and everything else through Bluestein's
//! chirp-z fallback. Plans are cached per length; caching is purely a
//! performance choice and never affects results.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Largest radix handled directly by the Stockham and direct kernels
pub const MAX_RADIX: usize = 13;

/// Kernel choice for one transform length
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FftStrategy {
    /// Explicit O(n²) DFT for lengths up to [`MAX_RADIX`]
    Direct,
    /// Mixed-radix Stockham autosort over the given radix sequence
    /// (radix 4/2 stages for powers of two, primes up to 13 otherwise)
    Stockham(Vec<usize>),
    /// Rader's prime-length reduction to a cyclic convolution of length n-1
    Rader {
        /// A primitive root modulo n
        root: usize,
        /// Its multiplicative inverse modulo n
        root_inv: usize,
    },
    /// Bluestein's chirp-z reduction to a power-of-two convolution
    Bluestein,
}

/// Transform plan for a single length
#[derive(Debug, Clone)]
pub struct FftPlan {
    /// Transform length
    pub n: usize,
    /// Selected kernel
    pub strategy: FftStrategy,
}

impl FftPlan {
    /// Select a strategy for length `n`
    pub fn new(n: usize) -> Self {
        let strategy = if n <= MAX_RADIX {
            FftStrategy::Direct
        } else if let Some(factors) = radix_sequence(n) {
            FftStrategy::Stockham(factors)
        } else if is_prime(n) && is_smooth(n - 1) {
            let root = primitive_root(n);
            let root_inv = mod_pow(root as u64, n as u64 - 2, n as u64) as usize;
            FftStrategy::Rader { root, root_inv }
        } else {
            FftStrategy::Bluestein
        };
        Self { n, strategy }
    }
}

/// Look up (or create and cache) the plan for length `n`
pub fn plan_for(n: usize) -> Arc<FftPlan> {
    static CACHE: OnceLock<Mutex<HashMap<usize, Arc<FftPlan>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock();
    Arc::clone(
        guard
            .entry(n)
            .or_insert_with(|| Arc::new(FftPlan::new(n))),
    )
}

/// Radix sequence for a smooth composite, or None if some factor exceeds
/// [`MAX_RADIX`]. Powers of two decompose into radix-4 stages with at most
/// one trailing radix-2.
fn radix_sequence(n: usize) -> Option<Vec<usize>> {
    let mut factors = Vec::new();
    let mut rem = n;

    let mut twos = 0usize;
    while rem % 2 == 0 {
        rem /= 2;
        twos += 1;
    }
    factors.extend(std::iter::repeat(4).take(twos / 2));
    if twos % 2 == 1 {
        factors.push(2);
    }

    for p in [3usize, 5, 7, 11, 13] {
        while rem % p == 0 {
            rem /= p;
            factors.push(p);
        }
    }

    if rem == 1 {
        Some(factors)
    } else {
        None
    }
}

/// Whether every prime factor of `n` is at most [`MAX_RADIX`]
fn is_smooth(n: usize) -> bool {
    let mut rem = n;
    for p in [2usize, 3, 5, 7, 11, 13] {
        while rem % p == 0 {
            rem /= p;
        }
    }
    rem == 1
}

/// Deterministic trial-division primality test
fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Full prime factorization (distinct primes only)
fn distinct_prime_factors(mut n: usize) -> Vec<usize> {
    let mut primes = Vec::new();
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            primes.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        primes.push(n);
    }
    primes
}

/// Modular exponentiation with 128-bit intermediates
fn mod_pow(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut result = 1u64;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = ((result as u128 * base as u128) % modulus as u128) as u64;
        }
        base = ((base as u128 * base as u128) % modulus as u128) as u64;
        exp >>= 1;
    }
    result
}

/// Smallest primitive root modulo the prime `p`
///
/// `g` is primitive iff g^((p-1)/q) != 1 for every prime q dividing p-1.
fn primitive_root(p: usize) -> usize {
    let phi = (p - 1) as u64;
    let primes = distinct_prime_factors(p - 1);
    for g in 2..p {
        if primes
            .iter()
            .all(|&q| mod_pow(g as u64, phi / q as u64, p as u64) != 1)
        {
            return g;
        }
    }
    unreachable!("every prime has a primitive root");
}

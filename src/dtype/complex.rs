//! Complex number types for the FFT engine
//!
//! Complex numbers are stored in interleaved format (re, im, re, im...),
//! matching numpy and FFTW conventions, and are compatible with bytemuck
//! for zero-copy reinterpretation of array storage.

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Macro to implement a complex number type with all operations
///
/// This avoids code duplication between Complex64 and Complex128.
macro_rules! impl_complex {
    ($name:ident, $float:ty, $doc_bits:literal, $doc_float_bits:literal) => {
        #[doc = concat!($doc_bits, "-bit complex number with ", $doc_float_bits, " real and imaginary parts")]
        ///
        #[doc = concat!("Memory layout: ", stringify!($float), " × 2, interleaved.")]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// Zero complex number
            pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

            /// One (real unit)
            pub const ONE: Self = Self { re: 1.0, im: 0.0 };

            /// Imaginary unit i
            pub const I: Self = Self { re: 0.0, im: 1.0 };

            /// Create a new complex number
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// Create a complex number from polar form: r * e^(iθ)
            #[inline]
            pub fn from_polar(r: $float, theta: $float) -> Self {
                Self {
                    re: r * theta.cos(),
                    im: r * theta.sin(),
                }
            }

            /// Magnitude (absolute value): |z| = sqrt(re² + im²)
            #[inline]
            pub fn magnitude(self) -> $float {
                (self.re * self.re + self.im * self.im).sqrt()
            }

            /// Squared magnitude: |z|² = re² + im²
            #[inline]
            pub fn magnitude_squared(self) -> $float {
                self.re * self.re + self.im * self.im
            }

            /// Phase angle (argument): atan2(im, re)
            #[inline]
            pub fn phase(self) -> $float {
                self.im.atan2(self.re)
            }

            /// Complex conjugate: conj(a + bi) = a - bi
            #[inline]
            pub fn conj(self) -> Self {
                Self {
                    re: self.re,
                    im: -self.im,
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    re: self.re + rhs.re,
                    im: self.im + rhs.im,
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    re: self.re - rhs.re,
                    im: self.im - rhs.im,
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    re: self.re * rhs.re - self.im * rhs.im,
                    im: self.re * rhs.im + self.im * rhs.re,
                }
            }
        }

        impl Div for $name {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                let denom = rhs.magnitude_squared();
                Self {
                    re: (self.re * rhs.re + self.im * rhs.im) / denom,
                    im: (self.im * rhs.re - self.re * rhs.im) / denom,
                }
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    re: -self.re,
                    im: -self.im,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im >= 0.0 {
                    write!(f, "{}+{}i", self.re, self.im)
                } else {
                    write!(f, "{}{}i", self.re, self.im)
                }
            }
        }
    };
}

impl_complex!(Complex64, f32, "64", "f32");
impl_complex!(Complex128, f64, "128", "f64");

impl From<Complex64> for Complex128 {
    #[inline]
    fn from(z: Complex64) -> Self {
        Self {
            re: z.re as f64,
            im: z.im as f64,
        }
    }
}

impl From<Complex128> for Complex64 {
    #[inline]
    fn from(z: Complex128) -> Self {
        Self {
            re: z.re as f32,
            im: z.im as f32,
        }
    }
}

/// Scalar abstraction over the two complex precisions
///
/// FFT kernels are generic over this trait so the same Stockham, Rader and
/// Bluestein code serves both `Complex64` and `Complex128`. Angle arithmetic
/// is always done in f64 and narrowed at the boundary, matching what a
/// single-precision kernel with double-precision twiddle generation does.
pub trait ComplexScalar:
    Copy
    + Clone
    + Default
    + Send
    + Sync
    + Pod
    + Zeroable
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// The additive identity
    const ZERO: Self;

    /// Build from f64 real/imaginary parts, narrowing if needed
    fn from_f64_parts(re: f64, im: f64) -> Self;

    /// Unit-magnitude value e^(iθ) for an f64 angle
    fn cis(theta: f64) -> Self;

    /// Complex conjugate
    fn conj(self) -> Self;

    /// Multiply both components by an f64 factor
    fn scale(self, factor: f64) -> Self;

    /// Real part widened to f64
    fn re_f64(self) -> f64;

    /// Imaginary part widened to f64
    fn im_f64(self) -> f64;
}

impl ComplexScalar for Complex64 {
    const ZERO: Self = Complex64::ZERO;

    #[inline]
    fn from_f64_parts(re: f64, im: f64) -> Self {
        Self::new(re as f32, im as f32)
    }

    #[inline]
    fn cis(theta: f64) -> Self {
        Self::new(theta.cos() as f32, theta.sin() as f32)
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(self)
    }

    #[inline]
    fn scale(self, factor: f64) -> Self {
        Self::new(self.re * factor as f32, self.im * factor as f32)
    }

    #[inline]
    fn re_f64(self) -> f64 {
        self.re as f64
    }

    #[inline]
    fn im_f64(self) -> f64 {
        self.im as f64
    }
}

impl ComplexScalar for Complex128 {
    const ZERO: Self = Complex128::ZERO;

    #[inline]
    fn from_f64_parts(re: f64, im: f64) -> Self {
        Self::new(re, im)
    }

    #[inline]
    fn cis(theta: f64) -> Self {
        Self::new(theta.cos(), theta.sin())
    }

    #[inline]
    fn conj(self) -> Self {
        Complex128::conj(self)
    }

    #[inline]
    fn scale(self, factor: f64) -> Self {
        Self::new(self.re * factor, self.im * factor)
    }

    #[inline]
    fn re_f64(self) -> f64 {
        self.re
    }

    #[inline]
    fn im_f64(self) -> f64 {
        self.im
    }
}

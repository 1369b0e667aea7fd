use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use num_complex::Complex64;

/// Tolerance used when comparing array elements for equality.
pub const EQ_TOLERANCE: f64 = 1e-6;

/// Logical element type of an array.
///
/// Every element is stored in a buffer of `f64` slots. Real elements use one
/// slot. Complex elements use two consecutive slots, real lane followed by
/// imaginary lane.
///
/// Layout offsets and strides are always expressed in element units.
/// [`physical`](Element::physical) is the only place where they are converted
/// to slot positions.
pub trait Element:
    Copy + Debug + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    /// Number of buffer slots occupied by one element.
    const SLOTS: usize;

    fn zero() -> Self;

    fn one() -> Self;

    /// Create an element with real part `re` and no imaginary part.
    fn from_real(re: f64) -> Self;

    /// Real part of the element.
    fn real(self) -> f64;

    /// Absolute value (modulus for complex elements).
    fn magnitude(self) -> f64;

    /// Multiply by a real factor.
    fn scale(self, factor: f64) -> Self;

    /// Return true if every component of `self` differs from the
    /// corresponding component of `other` by at most `tolerance`.
    fn approx_eq(self, other: Self, tolerance: f64) -> bool;

    /// Read the element stored at slot position `pos`.
    fn read(slots: &[f64], pos: usize) -> Self;

    /// Overwrite the element stored at slot position `pos`.
    fn write(slots: &mut [f64], pos: usize, value: Self);

    /// Append the slots of this element to `out`.
    fn push_slots(self, out: &mut Vec<f64>);

    /// Convert an element position to the slot position of its first lane.
    #[inline]
    fn physical(offset: usize) -> usize {
        offset * Self::SLOTS
    }
}

impl Element for f64 {
    const SLOTS: usize = 1;

    fn zero() -> f64 {
        0.
    }

    fn one() -> f64 {
        1.
    }

    fn from_real(re: f64) -> f64 {
        re
    }

    fn real(self) -> f64 {
        self
    }

    fn magnitude(self) -> f64 {
        self.abs()
    }

    fn scale(self, factor: f64) -> f64 {
        self * factor
    }

    fn approx_eq(self, other: f64, tolerance: f64) -> bool {
        (self - other).abs() <= tolerance
    }

    #[inline]
    fn read(slots: &[f64], pos: usize) -> f64 {
        slots[pos]
    }

    #[inline]
    fn write(slots: &mut [f64], pos: usize, value: f64) {
        slots[pos] = value;
    }

    fn push_slots(self, out: &mut Vec<f64>) {
        out.push(self);
    }
}

impl Element for Complex64 {
    const SLOTS: usize = 2;

    fn zero() -> Complex64 {
        Complex64::new(0., 0.)
    }

    fn one() -> Complex64 {
        Complex64::new(1., 0.)
    }

    fn from_real(re: f64) -> Complex64 {
        Complex64::new(re, 0.)
    }

    fn real(self) -> f64 {
        self.re
    }

    fn magnitude(self) -> f64 {
        self.norm()
    }

    fn scale(self, factor: f64) -> Complex64 {
        self * factor
    }

    fn approx_eq(self, other: Complex64, tolerance: f64) -> bool {
        (self.re - other.re).abs() <= tolerance && (self.im - other.im).abs() <= tolerance
    }

    #[inline]
    fn read(slots: &[f64], pos: usize) -> Complex64 {
        Complex64::new(slots[pos], slots[pos + 1])
    }

    #[inline]
    fn write(slots: &mut [f64], pos: usize, value: Complex64) {
        slots[pos] = value.re;
        slots[pos + 1] = value.im;
    }

    fn push_slots(self, out: &mut Vec<f64>) {
        out.push(self.re);
        out.push(self.im);
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::Element;

    #[test]
    fn test_complex_slots() {
        let mut slots = vec![0.; 6];
        let pos = Complex64::physical(1);
        assert_eq!(pos, 2);

        Complex64::write(&mut slots, pos, Complex64::new(3., -4.));
        assert_eq!(slots, [0., 0., 3., -4., 0., 0.]);
        assert_eq!(Complex64::read(&slots, pos), Complex64::new(3., -4.));
        assert_eq!(Complex64::new(3., -4.).magnitude(), 5.);

        let mut out = Vec::new();
        Complex64::new(1., 2.).push_slots(&mut out);
        assert_eq!(out, [1., 2.]);
    }

    #[test]
    fn test_approx_eq() {
        let a = Complex64::new(1., 2.);
        assert!(a.approx_eq(Complex64::new(1. + 1e-7, 2. - 1e-7), 1e-6));
        assert!(!a.approx_eq(Complex64::new(1., 2. + 1e-5), 1e-6));
        assert!(2.0f64.approx_eq(2.0000005, 1e-6));
        assert_eq!(f64::physical(3), 3);
    }
}

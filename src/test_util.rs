use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::zip;

use num_complex::Complex64;

use crate::array::NdArray;
use crate::element::Element;

/// Default absolute tolerance used by [`ApproxEq::approx_eq`].
pub const DEFAULT_ABS_TOLERANCE: f64 = 1e-8;

/// Default relative tolerance used by [`ApproxEq::approx_eq`].
pub const DEFAULT_REL_TOLERANCE: f64 = 1e-5;

/// Trait that tests whether two values are approximately equal.
///
/// The comparison takes into account both the absolute difference of the values
/// and the relative difference, in the manner of NumPy's `np.allclose`.
pub trait ApproxEq {
    /// Test whether `self` is "close" to `other` according to the formula:
    ///
    /// ```text
    /// (self - other).abs() <= atol + rtol * other.abs()
    /// ```
    ///
    /// Complex values are compared component-wise.
    fn approx_eq_with_atol_rtol(&self, other: &Self, atol: f64, rtol: f64) -> bool;

    /// Test if `other` is approximately equal to `self` with the default
    /// tolerances.
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_with_atol_rtol(other, DEFAULT_ABS_TOLERANCE, DEFAULT_REL_TOLERANCE)
    }
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq_with_atol_rtol(&self, other: &f64, atol: f64, rtol: f64) -> bool {
        (self - other).abs() <= atol + rtol * other.abs()
    }
}

impl ApproxEq for Complex64 {
    fn approx_eq_with_atol_rtol(&self, other: &Complex64, atol: f64, rtol: f64) -> bool {
        self.re.approx_eq_with_atol_rtol(&other.re, atol, rtol)
            && self.im.approx_eq_with_atol_rtol(&other.im, atol, rtol)
    }
}

#[derive(Debug)]
pub enum ExpectEqualError {
    ShapeMismatch(String),
    ValueMismatch(String),
}

impl Display for ExpectEqualError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectEqualError::ShapeMismatch(details) => write!(f, "{}", details),
            ExpectEqualError::ValueMismatch(details) => write!(f, "{}", details),
        }
    }
}

impl Error for ExpectEqualError {}

/// Check that the shapes of two arrays are equal and that their contents
/// are approximately equal.
///
/// If there are mismatches, this returns an `Err` with a message indicating
/// the count of mismatches and details of the first few.
pub fn expect_equal<T: Element + ApproxEq>(
    x: &NdArray<T>,
    y: &NdArray<T>,
) -> Result<(), ExpectEqualError> {
    expect_equal_with_tolerance(x, y, DEFAULT_ABS_TOLERANCE, DEFAULT_REL_TOLERANCE)
}

/// Variant of [`expect_equal`] with custom tolerances.
pub fn expect_equal_with_tolerance<T: Element + ApproxEq>(
    x: &NdArray<T>,
    y: &NdArray<T>,
    atol: f64,
    rtol: f64,
) -> Result<(), ExpectEqualError> {
    if x.shape() != y.shape() {
        return Err(ExpectEqualError::ShapeMismatch(format!(
            "Arrays have different shapes. {:?} vs. {:?}",
            x.shape(),
            y.shape()
        )));
    }

    let mismatches: Vec<_> = zip(x.indices(), zip(x.to_vec(), y.to_vec()))
        .filter(|(_, (xi, yi))| !xi.approx_eq_with_atol_rtol(yi, atol, rtol))
        .map(|(index, (xi, yi))| (index.to_vec(), xi, yi))
        .collect();

    if mismatches.is_empty() {
        return Ok(());
    }

    let max_examples = 16;
    Err(ExpectEqualError::ValueMismatch(format!(
        "Array values differ at {} of {} indexes: {:?}{}",
        mismatches.len(),
        x.len(),
        &mismatches[..mismatches.len().min(max_examples)],
        if mismatches.len() > max_examples {
            "..."
        } else {
            ""
        }
    )))
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::{expect_equal, expect_equal_with_tolerance, ApproxEq, ExpectEqualError};
    use crate::RealArray;

    #[test]
    fn test_approx_eq() {
        let vals = [-1000., -5., -0.5, 0., 0.5, 5., 1000.];
        for val in vals {
            assert!(val.approx_eq(&val));

            // 9e-9 and 9e-6 are slightly smaller than the default tolerances.
            let close = val + 9e-9 + val * 9e-6;
            assert!(val.approx_eq(&close));
        }
        assert!(!1.0f64.approx_eq(&1.001));

        let a = Complex64::new(1., 2.);
        assert!(a.approx_eq(&Complex64::new(1., 2. + 1e-9)));
        assert!(!a.approx_eq(&Complex64::new(1., 2.1)));
    }

    #[test]
    fn test_expect_equal() {
        let x = RealArray::from_vec(vec![1., 2., 3.]);
        let y = RealArray::from_vec(vec![1., 2.5, 3.]);
        assert!(expect_equal(&x, &x).is_ok());

        let err = expect_equal(&x, &y).err().unwrap();
        assert!(matches!(&err, ExpectEqualError::ValueMismatch(_)));
        assert_eq!(
            err.to_string(),
            "Array values differ at 1 of 3 indexes: [([1], 2.0, 2.5)]"
        );
        assert!(expect_equal_with_tolerance(&x, &y, 0.5, 0.).is_ok());

        let z = RealArray::zeros(&[3, 1]);
        assert!(matches!(
            expect_equal(&x, &z),
            Err(ExpectEqualError::ShapeMismatch(_))
        ));
    }
}

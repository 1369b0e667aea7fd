//! Reductions and cumulative sums.

use std::fmt;
use std::str::FromStr;

use crate::array::NdArray;
use crate::element::Element;
use crate::errors::ArrayError;
use crate::layout::{remove_dim, Dims};

/// Kind of reduction applied to each lane of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Mean,
    /// Sum of magnitudes.
    Norm1,
    /// Euclidean norm.
    Norm2,
    /// Largest magnitude.
    NormMax,
    /// Element with the largest real part.
    Max,
    /// Element with the smallest real part.
    Min,
    Prod,
}

impl ReduceOp {
    pub fn name(self) -> &'static str {
        match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Norm1 => "norm1",
            ReduceOp::Norm2 => "norm2",
            ReduceOp::NormMax => "normmax",
            ReduceOp::Max => "max",
            ReduceOp::Min => "min",
            ReduceOp::Prod => "prod",
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReduceOp {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<ReduceOp, ArrayError> {
        let op = match s.to_ascii_lowercase().as_str() {
            "sum" => ReduceOp::Sum,
            "mean" => ReduceOp::Mean,
            "norm1" | "norm_1" => ReduceOp::Norm1,
            "norm2" | "norm_2" => ReduceOp::Norm2,
            "normmax" | "norm_max" => ReduceOp::NormMax,
            "max" => ReduceOp::Max,
            "min" => ReduceOp::Min,
            "prod" => ReduceOp::Prod,
            _ => return Err(ArrayError::UnsupportedOperation(format!("reduction \"{}\"", s))),
        };
        Ok(op)
    }
}

/// Select the element whose real part is preferred by `better`. Ties keep the
/// earlier element.
fn select_by_real<T: Element>(values: &[T], better: impl Fn(f64, f64) -> bool) -> T {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return T::zero();
    };
    iter.fold(first, |best, x| {
        if better(x.real(), best.real()) {
            x
        } else {
            best
        }
    })
}

/// Reduce a list of elements to a single element.
///
/// Norms are returned as elements with a zero imaginary part. Reducing an
/// empty list returns zero for every kind except `Prod`, which returns one.
pub fn reduce_slice<T: Element>(op: ReduceOp, values: &[T]) -> T {
    match op {
        ReduceOp::Sum => values.iter().fold(T::zero(), |acc, &x| acc + x),
        ReduceOp::Mean => {
            if values.is_empty() {
                T::zero()
            } else {
                reduce_slice(ReduceOp::Sum, values).scale(1. / values.len() as f64)
            }
        }
        ReduceOp::Norm1 => T::from_real(values.iter().map(|x| x.magnitude()).sum()),
        ReduceOp::Norm2 => T::from_real(
            values
                .iter()
                .map(|x| {
                    let m = x.magnitude();
                    m * m
                })
                .sum::<f64>()
                .sqrt(),
        ),
        ReduceOp::NormMax => T::from_real(
            values
                .iter()
                .map(|x| x.magnitude())
                .fold(0., f64::max),
        ),
        ReduceOp::Max => select_by_real(values, |x, best| x > best),
        ReduceOp::Min => select_by_real(values, |x, best| x < best),
        ReduceOp::Prod => values.iter().fold(T::one(), |acc, &x| acc * x),
    }
}

impl<T: Element> NdArray<T> {
    /// Return the shape of the result of reducing over `dim`.
    fn reduced_shape(&self, dim: usize) -> Result<Dims, ArrayError> {
        let ndim = self.ndim();
        match (ndim, dim) {
            (0, 0) | (1, 0) => Ok(Dims::new()),
            (1, 1) => Ok(self.shape().iter().copied().collect()),
            (0 | 1, _) => Err(ArrayError::InvalidDimension { dim, ndim }),
            _ if dim >= ndim => Err(ArrayError::InvalidDimension { dim, ndim }),
            _ => Ok(remove_dim(self.shape(), dim)),
        }
    }

    /// Reduce each lane along `dim` to a single element.
    ///
    /// For arrays of rank >= 2 the result has the shape of this array with
    /// `dim` removed. Reducing a vector over dimension 0, or a scalar, gives a
    /// scalar. Reducing a vector over dimension 1 reduces each element
    /// individually.
    pub fn reduce(&self, op: ReduceOp, dim: usize) -> Result<NdArray<T>, ArrayError> {
        let shape = self.reduced_shape(dim)?;
        let values = self
            .dimension_iter(dim)?
            .map(|slice| reduce_slice(op, &slice.result.to_vec()));
        Ok(NdArray::from_logical(values, &shape, self.order()))
    }

    /// Reduce all elements to a single element.
    pub fn reduce_all(&self, op: ReduceOp) -> T {
        reduce_slice(op, &self.to_vec())
    }

    pub fn sum(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Sum, dim)
    }

    pub fn mean(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Mean, dim)
    }

    pub fn norm1(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Norm1, dim)
    }

    pub fn norm2(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Norm2, dim)
    }

    pub fn normmax(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::NormMax, dim)
    }

    /// Return the elements with the largest real part along `dim`.
    pub fn max(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Max, dim)
    }

    /// Return the elements with the smallest real part along `dim`.
    pub fn min(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Min, dim)
    }

    pub fn prod(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.reduce(ReduceOp::Prod, dim)
    }

    /// Return the element with the largest real part, or `None` if the array
    /// is empty.
    pub fn max_value(&self) -> Option<T> {
        (!self.is_empty()).then(|| self.reduce_all(ReduceOp::Max))
    }

    /// Return the element with the smallest real part, or `None` if the array
    /// is empty.
    pub fn min_value(&self) -> Option<T> {
        (!self.is_empty()).then(|| self.reduce_all(ReduceOp::Min))
    }

    /// Replace each element of a vector view with the running total up to and
    /// including that element.
    fn accumulate(&mut self) {
        let mut total = T::zero();
        let values: Vec<T> = self
            .to_vec()
            .into_iter()
            .map(|x| {
                total = total + x;
                total
            })
            .collect();
        let offsets: Vec<usize> = self.layout().offsets().collect();
        for (offset, value) in offsets.into_iter().zip(values) {
            self.write_at(offset, value);
        }
    }

    /// Compute cumulative sums along `dim`, in place where possible.
    ///
    /// - Scalars are unchanged.
    /// - Vectors accumulate left to right for dimension 0 or 1.
    /// - For the last dimension of an array with rank >= 2, the elements are
    ///   flattened and accumulated in logical order. The result is a new array
    ///   of shape `[1, len]` and this array is not modified.
    /// - For any other dimension, each lane along `dim` is accumulated in
    ///   place.
    ///
    /// Returns the array holding the result, which is a view of `self` except
    /// in the flattening case.
    pub fn cumsumi(&mut self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        let ndim = self.ndim();
        match ndim {
            0 => {}
            1 => match dim {
                0 | 1 => self.accumulate(),
                _ => return Err(ArrayError::InvalidDimension { dim, ndim }),
            },
            _ if dim >= ndim => return Err(ArrayError::InvalidDimension { dim, ndim }),
            _ if dim == ndim - 1 => {
                let mut flattened = self.ravel();
                flattened.accumulate();
                return Ok(flattened);
            }
            _ => {
                for i in 0..self.vectors_along_dimension(dim)? {
                    self.vector_along_dimension(i, dim)?.accumulate();
                }
            }
        }
        Ok(self.clone())
    }

    /// Return cumulative sums along `dim` as a new array.
    ///
    /// See [`cumsumi`](NdArray::cumsumi).
    pub fn cumsum(&self, dim: usize) -> Result<NdArray<T>, ArrayError> {
        self.dup().cumsumi(dim)
    }
}

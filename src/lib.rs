//! ndview provides strided multi-dimensional views over shared flat buffers of
//! real or complex numbers.
//!
//! # Buffers and layouts
//!
//! An array ([`NdArray`]) is the combination of a [`Buffer`] of `f64` slots and
//! a [`Layout`], which describes the number of dimensions (the _rank_), the
//! size of each (the _shape_), the step between successive entries along each
//! dimension (the _strides_) and the position of the first element (the
//! _offset_).
//!
//! Buffers are reference counted. Slicing, permuting, transposing and taking
//! sub-arrays create new layouts over the same buffer, so a write through one
//! view is visible through all others. Use [`NdArray::dup`] to get an
//! independent copy.
//!
//! ```
//! use ndview::RealArray;
//!
//! let x = RealArray::from_data(&[2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
//! let mut row = x.slice(1).unwrap();
//! row.put(&[0], 10.).unwrap();
//! assert_eq!(x.get(&[1, 0]), Ok(10.));
//!
//! let t = x.transpose().unwrap();
//! assert_eq!(t.shape(), &[3, 2]);
//! assert_eq!(t.to_vec(), [1., 10., 2., 5., 3., 6.]);
//! ```
//!
//! # Complex arrays
//!
//! [`ComplexArray`] stores each element as two consecutive slots, real part
//! first. Strides and offsets are always counted in elements, not slots.
//!
//! # Reductions and dimension iteration
//!
//! [`NdArray::dimension_iter`] visits the 1-D lanes of an array along one
//! dimension. Reductions such as [`NdArray::sum`] are built on it, and
//! [`NdArray::iterate_over_dimension`] applies a caller-supplied [`SliceOp`]
//! to each lane, optionally writing results back.
//!
//! ```
//! use ndview::RealArray;
//!
//! let x = RealArray::from_data(&[2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
//! assert_eq!(x.sum(0).unwrap().to_vec(), [5., 7., 9.]);
//! assert_eq!(x.sum(1).unwrap().to_vec(), [6., 15.]);
//! ```
//!
//! # Threading
//!
//! Arrays are not thread safe. Views sharing a buffer must only be used from
//! the thread that created them.

mod array;
mod buffer;
mod complex;
mod dimension;
mod element;
pub mod env;
pub mod errors;
mod impl_debug;
mod index_iterator;
pub mod layout;
mod reduce;

pub use array::{ComplexArray, NdArray, RealArray};
pub use buffer::Buffer;
pub use dimension::{DimensionIter, DimensionSlice, IterOptions, SliceOp};
pub use element::{Element, EQ_TOLERANCE};
pub use errors::{ArrayError, IndexError};
pub use index_iterator::{Index, Indices};
pub use layout::{Layout, Order};
pub use reduce::{reduce_slice, ReduceOp};

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::{Element, SliceOp};
}

// Public for use by tests in this repo, but currently considered internal to
// the project.
#[doc(hidden)]
pub mod test_util;

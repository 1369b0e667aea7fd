use std::iter::zip;

use smallvec::SmallVec;

use crate::errors::{ArrayError, IndexError};
use crate::index_iterator::Indices;

/// Dimension sizes or strides of a layout.
pub type Dims = SmallVec<[usize; 4]>;

/// Order in which elements are laid out when a layout is created without
/// explicit strides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Last dimension varies fastest (C order).
    #[default]
    RowMajor,

    /// First dimension varies fastest (Fortran order).
    ColumnMajor,
}

/// Return true if `permutation` is a valid permutation of dimensions for
/// an array of rank `ndim`.
pub fn is_valid_permutation(ndim: usize, permutation: &[usize]) -> bool {
    permutation.len() == ndim
        && (0..ndim).all(|dim| permutation.iter().filter(|d| **d == dim).count() == 1)
}

/// Return the strides of a dense layout with a given shape and order.
pub fn contiguous_strides(shape: &[usize], order: Order) -> Dims {
    let mut strides: Dims = SmallVec::from_elem(0, shape.len());
    let mut stride = 1;
    match order {
        Order::RowMajor => {
            for i in (0..shape.len()).rev() {
                strides[i] = stride;
                stride *= shape[i];
            }
        }
        Order::ColumnMajor => {
            for i in 0..shape.len() {
                strides[i] = stride;
                stride *= shape[i];
            }
        }
    }
    strides
}

/// Return true if a given shape and strides describe a dense layout in
/// row-major order, ie. one where logical order matches storage order.
pub fn is_contiguous(shape: &[usize], strides: &[usize]) -> bool {
    let mut product = 1;
    for (&size, &stride) in zip(shape, strides).rev() {
        // Size-1 dims only have index 0, so their stride never matters.
        if size == 1 {
            continue;
        }
        if stride != product {
            return false;
        }
        product *= size;
    }
    true
}

/// Describes how an array view maps multi-dimensional indices to positions in
/// its buffer: the size of each dimension (the _shape_), the gap between
/// successive entries along each dimension (the _strides_) and the position
/// of the first element (the _offset_).
///
/// Strides and offset are in element units. For arrays whose elements occupy
/// more than one buffer slot, conversion to slot positions happens in
/// [`Element::physical`](crate::Element::physical).
///
/// Layouts are immutable once created. Deriving a view produces a new layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Dimension sizes followed by the corresponding strides.
    shape_and_strides: SmallVec<[usize; 8]>,
    offset: usize,
    order: Order,
}

impl Layout {
    /// Create a dense layout with default strides for `order` and zero offset.
    pub fn from_shape(shape: &[usize], order: Order) -> Layout {
        let strides = contiguous_strides(shape, order);
        Self::new_unchecked(shape, &strides, 0, order)
    }

    /// Create a layout with explicit strides and offset.
    ///
    /// Fails if `shape` and `strides` have different lengths.
    pub fn from_parts(
        shape: &[usize],
        strides: &[usize],
        offset: usize,
        order: Order,
    ) -> Result<Layout, ArrayError> {
        if shape.len() != strides.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: strides.to_vec(),
            });
        }
        Ok(Self::new_unchecked(shape, strides, offset, order))
    }

    fn new_unchecked(shape: &[usize], strides: &[usize], offset: usize, order: Order) -> Layout {
        debug_assert_eq!(shape.len(), strides.len());
        let mut shape_and_strides = SmallVec::with_capacity(shape.len() * 2);
        shape_and_strides.extend_from_slice(shape);
        shape_and_strides.extend_from_slice(strides);
        Layout {
            shape_and_strides,
            offset,
            order,
        }
    }

    /// Return the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape_and_strides.len() / 2
    }

    /// Return the number of logical elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape_and_strides[..self.ndim()]
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.shape_and_strides[self.ndim()..]
    }

    #[inline]
    pub fn size(&self, dim: usize) -> usize {
        self.shape()[dim]
    }

    #[inline]
    pub fn stride(&self, dim: usize) -> usize {
        self.strides()[dim]
    }

    /// Position of the first element, in element units.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Return true if logical order matches storage order.
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(self.shape(), self.strides())
    }

    /// Map a multi-index to an element position.
    pub fn offset_of(&self, index: &[usize]) -> Result<usize, ArrayError> {
        if index.len() != self.ndim() {
            return Err(IndexError::ArityMismatch {
                expected: self.ndim(),
                actual: index.len(),
            }
            .into());
        }
        let mut offset = self.offset;
        for (&idx, (&size, &stride)) in zip(index, zip(self.shape(), self.strides())) {
            if idx >= size {
                return Err(IndexError::OutOfBounds.into());
            }
            offset += idx * stride;
        }
        Ok(offset)
    }

    /// Map a multi-index to an element position, without checking that it is
    /// valid for the shape.
    #[inline]
    pub fn offset_unchecked(&self, index: &[usize]) -> usize {
        self.offset
            + zip(index, self.strides())
                .map(|(idx, stride)| idx * stride)
                .sum::<usize>()
    }

    /// Map a multi-index to an element position without checking it against
    /// the shape. Returns `None` if the position overflows `usize`.
    pub fn checked_offset(&self, index: &[usize]) -> Option<usize> {
        zip(index, self.strides()).try_fold(self.offset, |offset, (&idx, &stride)| {
            offset.checked_add(idx.checked_mul(stride)?)
        })
    }

    /// Return an iterator over the element positions of this layout in
    /// logical order.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        Indices::from_shape(self.shape()).map(move |index| self.offset_unchecked(&index))
    }

    /// Map a linear index in logical (row-major) order to an element position.
    ///
    /// The index is decomposed into one digit per dimension, starting from the
    /// last, using the current strides. This is valid for any layout, not just
    /// dense ones.
    pub fn linear_offset(&self, index: usize) -> Result<usize, ArrayError> {
        if index >= self.len() {
            return Err(IndexError::OutOfBounds.into());
        }
        let mut rem = index;
        let mut offset = self.offset;
        for (&size, &stride) in zip(self.shape(), self.strides()).rev() {
            offset += (rem % size) * stride;
            rem /= size;
        }
        Ok(offset)
    }

    /// Return the largest element position referenced by this layout, or
    /// `None` if the layout is empty.
    ///
    /// Fails with [`IndexError::OutOfBounds`] if the position overflows
    /// `usize`.
    pub fn max_offset(&self) -> Result<Option<usize>, ArrayError> {
        if self.is_empty() {
            return Ok(None);
        }
        let max_index: Dims = self.shape().iter().map(|size| size - 1).collect();
        self.checked_offset(&max_index)
            .map(Some)
            .ok_or(IndexError::OutOfBounds.into())
    }

    /// Check that every position referenced by this layout is less than
    /// `len`, the buffer length in element units.
    ///
    /// The offset must be less than `len`. An empty layout references no
    /// positions, so its offset may also equal `len`, as for an empty buffer.
    pub fn check_bounds(&self, len: usize) -> Result<(), ArrayError> {
        let empty = self.is_empty();
        if self.offset > len || (self.offset == len && !empty) {
            return Err(IndexError::InvalidOffset {
                offset: self.offset,
                len,
            }
            .into());
        }
        match self.max_offset()? {
            Some(max_offset) if max_offset >= len => Err(IndexError::OutOfBounds.into()),
            _ => Ok(()),
        }
    }

    /// Return a layout with axes reordered so that output dimension `i` is
    /// input dimension `order[i]`.
    pub fn permuted(&self, order: &[usize]) -> Result<Layout, ArrayError> {
        if !is_valid_permutation(self.ndim(), order) {
            let dim = order
                .iter()
                .copied()
                .find(|&d| d >= self.ndim())
                .unwrap_or(order.len());
            return Err(ArrayError::InvalidDimension {
                dim,
                ndim: self.ndim(),
            });
        }
        let shape: Dims = order.iter().map(|&d| self.size(d)).collect();
        let strides: Dims = order.iter().map(|&d| self.stride(d)).collect();
        Ok(Self::new_unchecked(&shape, &strides, self.offset, self.order))
    }

    /// Return a layout with the order of dimensions reversed.
    pub fn transposed(&self) -> Layout {
        let shape: Dims = self.shape().iter().rev().copied().collect();
        let strides: Dims = self.strides().iter().rev().copied().collect();
        Self::new_unchecked(&shape, &strides, self.offset, self.order)
    }

    /// Return a layout that visits the same positions as this one, with its
    /// logical order following `self.order()` instead of row-major order.
    ///
    /// For column-major layouts this reverses the axes.
    pub fn in_storage_order(&self) -> Layout {
        match self.order {
            Order::RowMajor => self.clone(),
            Order::ColumnMajor => self.transposed(),
        }
    }

    /// Return the layout obtained by fixing the index along `dim`, which
    /// removes that dimension.
    pub fn index_axis(&self, dim: usize, index: usize) -> Result<Layout, ArrayError> {
        if dim >= self.ndim() {
            return Err(ArrayError::InvalidDimension {
                dim,
                ndim: self.ndim(),
            });
        }
        if index >= self.size(dim) {
            return Err(IndexError::OutOfBounds.into());
        }
        let shape = remove_dim(self.shape(), dim);
        let strides = remove_dim(self.strides(), dim);
        let offset = self.offset + index * self.stride(dim);
        Ok(Self::new_unchecked(&shape, &strides, offset, self.order))
    }

    /// Return a layout with the same order, and a new shape, strides and
    /// offset.
    pub fn with_parts(
        &self,
        shape: &[usize],
        strides: &[usize],
        offset: usize,
    ) -> Result<Layout, ArrayError> {
        Self::from_parts(shape, strides, offset, self.order)
    }
}

/// Return `dims` with the entry at `dim` removed.
pub fn remove_dim(dims: &[usize], dim: usize) -> Dims {
    dims.iter()
        .enumerate()
        .filter_map(|(i, &d)| (i != dim).then_some(d))
        .collect()
}

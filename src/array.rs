use std::marker::PhantomData;

use num_complex::Complex64;
use smallvec::SmallVec;

use crate::buffer::Buffer;
use crate::element::{Element, EQ_TOLERANCE};
use crate::errors::{ArrayError, IndexError};
use crate::index_iterator::Indices;
use crate::layout::{contiguous_strides, remove_dim, Dims, Layout, Order};

/// A multi-dimensional view of elements stored in a shared [`Buffer`].
///
/// An array combines a buffer handle with a [`Layout`] which maps indices to
/// buffer positions. Deriving a view ([`slice`](NdArray::slice),
/// [`permute`](NdArray::permute), [`transpose`](NdArray::transpose),
/// [`sub_array`](NdArray::sub_array) and contiguous
/// [`reshape`](NdArray::reshape)) creates a new layout over the same buffer, so
/// writes through one view are visible through every other view of that
/// buffer. [`dup`](NdArray::dup) creates an independent copy.
///
/// The element type determines how many buffer slots each element occupies,
/// see [`Element`]. Use the [`RealArray`] and [`ComplexArray`] aliases.
///
/// Cloning an array clones the view, not the data.
#[derive(Clone)]
pub struct NdArray<T: Element> {
    buffer: Buffer,

    // Constructors must ensure that every valid index of `layout` maps to an
    // element position whose slots lie within `buffer`.
    layout: Layout,
    _marker: PhantomData<T>,
}

/// Array of real numbers, one buffer slot per element.
pub type RealArray = NdArray<f64>;

/// Array of complex numbers, stored as interleaved (real, imaginary) slot
/// pairs.
pub type ComplexArray = NdArray<Complex64>;

impl<T: Element> NdArray<T> {
    /// Create a view over an existing buffer.
    ///
    /// Fails if the layout's offset is outside the buffer, or if any index
    /// maps to a position beyond the end of the buffer.
    pub fn from_buffer(buffer: Buffer, layout: Layout) -> Result<NdArray<T>, ArrayError> {
        layout.check_bounds(buffer.len() / T::SLOTS)?;
        Ok(NdArray {
            buffer,
            layout,
            _marker: PhantomData,
        })
    }

    /// Create an array from raw buffer slots, interpreted with row-major
    /// strides.
    ///
    /// For complex arrays, `data` holds interleaved real and imaginary parts.
    pub fn from_data(shape: &[usize], data: Vec<f64>) -> Result<NdArray<T>, ArrayError> {
        Self::from_data_with_order(shape, data, Order::RowMajor)
    }

    /// Create an array from raw buffer slots, with default strides for
    /// `order`.
    pub fn from_data_with_order(
        shape: &[usize],
        data: Vec<f64>,
        order: Order,
    ) -> Result<NdArray<T>, ArrayError> {
        Self::from_buffer(Buffer::from_vec(data), Layout::from_shape(shape, order))
    }

    /// Create an array from raw buffer slots with custom strides and offset,
    /// both in element units.
    pub fn from_data_with_strides(
        shape: &[usize],
        strides: &[usize],
        offset: usize,
        order: Order,
        data: Vec<f64>,
    ) -> Result<NdArray<T>, ArrayError> {
        let layout = Layout::from_parts(shape, strides, offset, order)?;
        Self::from_buffer(Buffer::from_vec(data), layout)
    }

    /// Create an array from elements in logical (row-major) order.
    pub fn from_elements(shape: &[usize], values: &[T]) -> Result<NdArray<T>, ArrayError> {
        let len: usize = shape.iter().product();
        if len != values.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![values.len()],
            });
        }
        Ok(Self::from_logical(values.iter().copied(), shape, Order::RowMajor))
    }

    /// Create a vector from a list of elements.
    pub fn from_vec(values: Vec<T>) -> NdArray<T> {
        let len = values.len();
        Self::from_logical(values.into_iter(), &[len], Order::RowMajor)
    }

    /// Create a rank-0 array holding `value`.
    pub fn scalar(value: T) -> NdArray<T> {
        Self::from_logical(std::iter::once(value), &[], Order::RowMajor)
    }

    /// Create a zero-filled array with row-major strides.
    pub fn zeros(shape: &[usize]) -> NdArray<T> {
        Self::zeros_with_order(shape, Order::RowMajor)
    }

    /// Create a zero-filled array with default strides for `order`.
    pub fn zeros_with_order(shape: &[usize], order: Order) -> NdArray<T> {
        let layout = Layout::from_shape(shape, order);
        NdArray {
            buffer: Buffer::zeros(layout.len() * T::SLOTS),
            layout,
            _marker: PhantomData,
        }
    }

    /// Stack equally-shaped arrays into a new array with one more dimension.
    ///
    /// The result has shape `[slices.len(), ...slice_shape]` and its own
    /// buffer.
    pub fn from_slices(slices: &[NdArray<T>]) -> Result<NdArray<T>, ArrayError> {
        let Some(first) = slices.first() else {
            return Ok(Self::zeros(&[0]));
        };
        let mut values = Vec::with_capacity(first.len() * slices.len());
        for slice in slices {
            if slice.shape() != first.shape() {
                return Err(ArrayError::ShapeMismatch {
                    expected: first.shape().to_vec(),
                    actual: slice.shape().to_vec(),
                });
            }
            values.extend(slice.to_vec());
        }
        let mut shape: Dims = SmallVec::with_capacity(first.ndim() + 1);
        shape.push(slices.len());
        shape.extend_from_slice(first.shape());
        Ok(Self::from_logical(values.into_iter(), &shape, first.order()))
    }

    /// Create a dense array with default strides for `order`, filled from
    /// elements in logical order.
    pub(crate) fn from_logical(
        values: impl Iterator<Item = T>,
        shape: &[usize],
        order: Order,
    ) -> NdArray<T> {
        let array = Self::zeros_with_order(shape, order);
        {
            let mut slots = array.buffer.borrow_mut();
            for (offset, value) in array.layout.offsets().zip(values) {
                T::write(&mut slots, T::physical(offset), value);
            }
        }
        array
    }

    /// Return the layout which maps indices to buffer positions.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Return a handle to the underlying buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Return true if `self` and `other` share a buffer.
    pub fn shares_buffer(&self, other: &NdArray<T>) -> bool {
        self.buffer.ptr_eq(&other.buffer)
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn strides(&self) -> &[usize] {
        self.layout.strides()
    }

    pub fn size(&self, dim: usize) -> usize {
        self.layout.size(dim)
    }

    pub fn stride(&self, dim: usize) -> usize {
        self.layout.stride(dim)
    }

    /// Position of the first element in the buffer, in element units.
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    pub fn order(&self) -> Order {
        self.layout.order()
    }

    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Return the number of logical elements.
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.ndim() == 0
    }

    pub fn is_vector(&self) -> bool {
        self.ndim() == 1
    }

    pub fn is_matrix(&self) -> bool {
        self.ndim() == 2
    }

    /// Return true for rank-1 arrays, which act as row vectors.
    pub fn is_row_vector(&self) -> bool {
        self.is_vector()
    }

    /// Return true for matrices with a single column.
    pub fn is_column_vector(&self) -> bool {
        self.is_matrix() && self.size(1) == 1
    }

    /// Return true if logical order matches storage order.
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Number of slices along the first dimension.
    pub fn slices(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn rows(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    pub fn columns(&self) -> usize {
        match self.ndim() {
            0 => 1,
            1 => self.size(0),
            _ => self.size(1),
        }
    }

    pub(crate) fn read_at(&self, offset: usize) -> T {
        T::read(&self.buffer.borrow(), T::physical(offset))
    }

    pub(crate) fn write_at(&self, offset: usize, value: T) {
        T::write(&mut self.buffer.borrow_mut(), T::physical(offset), value);
    }

    /// Return the element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<T, ArrayError> {
        Ok(self.read_at(self.layout.offset_of(index)?))
    }

    /// Return the element at a linear index in logical order.
    pub fn get_linear(&self, index: usize) -> Result<T, ArrayError> {
        Ok(self.read_at(self.layout.linear_offset(index)?))
    }

    /// Return a rank-0 view of the element at a multi-index.
    pub fn get_scalar(&self, index: &[usize]) -> Result<NdArray<T>, ArrayError> {
        let offset = self.layout.offset_of(index)?;
        self.derive(self.layout.with_parts(&[], &[], offset)?)
    }

    /// Return the single element of an array with one element.
    pub fn item(&self) -> Option<T> {
        match self.len() {
            1 => self.layout.offsets().next().map(|offset| self.read_at(offset)),
            _ => None,
        }
    }

    /// Set the element at a multi-index.
    pub fn put(&mut self, index: &[usize], value: T) -> Result<(), ArrayError> {
        let offset = self.layout.offset_of(index)?;
        self.write_at(offset, value);
        Ok(())
    }

    /// Set the element at a linear index in logical order.
    pub fn put_linear(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        let offset = self.layout.linear_offset(index)?;
        self.write_at(offset, value);
        Ok(())
    }

    /// Return the elements in logical order.
    pub fn to_vec(&self) -> Vec<T> {
        let slots = self.buffer.borrow();
        self.layout
            .offsets()
            .map(|offset| T::read(&slots, T::physical(offset)))
            .collect()
    }

    /// Return a dense copy of the buffer slots of every element, in logical
    /// order.
    ///
    /// Complex elements contribute their real and imaginary parts in turn.
    pub fn data(&self) -> Vec<f64> {
        let mut data = Vec::with_capacity(self.len() * T::SLOTS);
        for value in self.to_vec() {
            value.push_slots(&mut data);
        }
        data
    }

    /// Overwrite elements in logical order from `values`, whose length must
    /// equal `self.len()`.
    fn write_logical(&self, values: &[T]) {
        debug_assert_eq!(values.len(), self.len());
        let mut slots = self.buffer.borrow_mut();
        for (offset, &value) in self.layout.offsets().zip(values) {
            T::write(&mut slots, T::physical(offset), value);
        }
    }

    /// Copy every element of `source` into this view.
    ///
    /// `source` may alias this view.
    pub fn assign(&mut self, source: &NdArray<T>) -> Result<(), ArrayError> {
        if source.shape() != self.shape() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: source.shape().to_vec(),
            });
        }
        self.write_logical(&source.to_vec());
        Ok(())
    }

    /// Set every element of this view to `value`.
    pub fn fill(&mut self, value: T) {
        let mut slots = self.buffer.borrow_mut();
        for offset in self.layout.offsets() {
            T::write(&mut slots, T::physical(offset), value);
        }
    }

    /// Return a dense, independent copy of this view.
    pub fn dup(&self) -> NdArray<T> {
        Self::from_logical(self.to_vec().into_iter(), self.shape(), self.order())
    }

    /// Return a dense copy of this view with shape `[1, len]`.
    pub fn ravel(&self) -> NdArray<T> {
        Self::from_logical(self.to_vec().into_iter(), &[1, self.len()], self.order())
    }

    fn derive(&self, layout: Layout) -> Result<NdArray<T>, ArrayError> {
        Self::from_buffer(self.buffer.clone(), layout)
    }

    /// Return the `index`-th sub-array along the first dimension.
    ///
    /// The result has one fewer dimension and shares this array's buffer.
    pub fn slice(&self, index: usize) -> Result<NdArray<T>, ArrayError> {
        if self.is_scalar() {
            return Err(IndexError::SliceOfScalar.into());
        }
        self.derive(self.layout.index_axis(0, index)?)
    }

    /// Return the sub-array obtained by fixing `dim` to `index`.
    ///
    /// For a matrix, `slice_along(i, 0)` is row `i` and `slice_along(j, 1)` is
    /// column `j`.
    pub fn slice_along(&self, index: usize, dim: usize) -> Result<NdArray<T>, ArrayError> {
        if self.is_scalar() {
            return Err(IndexError::SliceOfScalar.into());
        }
        self.derive(self.layout.index_axis(dim, index)?)
    }

    /// Return an array with the same elements and a new shape.
    ///
    /// Elements are taken in the order given by [`order`](Self::order): last
    /// dimension fastest for row-major views, first dimension fastest for
    /// column-major views. A view that is dense in that order is reshaped
    /// without copying and gets dense strides for the same order. Other
    /// views are copied into a new buffer. Either way, reshaping back to the
    /// original shape gives the original elements.
    pub fn reshape(&self, shape: &[usize]) -> Result<NdArray<T>, ArrayError> {
        let len: usize = shape.iter().product();
        if len != self.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: shape.to_vec(),
            });
        }
        let source = self.layout.in_storage_order();
        if source.is_contiguous() {
            let strides = contiguous_strides(shape, self.order());
            return self.derive(self.layout.with_parts(shape, &strides, self.offset())?);
        }

        let reshaped = Self::zeros_with_order(shape, self.order());
        {
            let src = self.buffer.borrow();
            let mut dst = reshaped.buffer.borrow_mut();
            for (pos, offset) in source.offsets().enumerate() {
                T::write(&mut dst, T::physical(pos), T::read(&src, T::physical(offset)));
            }
        }
        Ok(reshaped)
    }

    /// Return a view with dimensions reordered so that dimension `i` of the
    /// result is dimension `order[i]` of this array.
    pub fn permute(&self, order: &[usize]) -> Result<NdArray<T>, ArrayError> {
        self.derive(self.layout.permuted(order)?)
    }

    /// Return a view with dimensions `a` and `b` exchanged.
    pub fn swap_axes(&self, a: usize, b: usize) -> Result<NdArray<T>, ArrayError> {
        let ndim = self.ndim();
        for dim in [a, b] {
            if dim >= ndim {
                return Err(ArrayError::InvalidDimension { dim, ndim });
            }
        }
        let mut order: Dims = (0..ndim).collect();
        order.swap(a, b);
        self.permute(&order)
    }

    /// Return the transposed view.
    ///
    /// A vector of shape `[n]` becomes a column of shape `[n, 1]` and a
    /// column of shape `[n, 1]` becomes a vector of shape `[n]`. Otherwise the
    /// order of all dimensions is reversed.
    pub fn transpose(&self) -> Result<NdArray<T>, ArrayError> {
        let layout = if self.is_row_vector() {
            let (size, stride) = (self.size(0), self.stride(0));
            self.layout
                .with_parts(&[size, 1], &[stride, (stride * size).max(1)], self.offset())?
        } else if self.is_column_vector() {
            self.layout
                .with_parts(&[self.size(0)], &[self.stride(0)], self.offset())?
        } else {
            self.layout.transposed()
        };
        self.derive(layout)
    }

    /// Return a view of a region of this array.
    ///
    /// The region starts at `offsets` and has the given shape, keeping the
    /// current strides.
    pub fn sub_array(&self, offsets: &[usize], shape: &[usize]) -> Result<NdArray<T>, ArrayError> {
        let strides: Dims = self.strides().iter().copied().collect();
        self.sub_array_with_strides(offsets, shape, &strides)
    }

    /// Return a view starting at `offsets` with a new shape and strides.
    ///
    /// Requesting the full shape returns this view if `offsets` are all zero,
    /// and fails otherwise.
    pub fn sub_array_with_strides(
        &self,
        offsets: &[usize],
        shape: &[usize],
        strides: &[usize],
    ) -> Result<NdArray<T>, ArrayError> {
        let ndim = self.ndim();
        if offsets.len() != ndim {
            return Err(IndexError::ArityMismatch {
                expected: ndim,
                actual: offsets.len(),
            }
            .into());
        }
        for dims in [shape, strides] {
            if dims.len() != ndim {
                return Err(ArrayError::ShapeMismatch {
                    expected: self.shape().to_vec(),
                    actual: dims.to_vec(),
                });
            }
        }

        if shape == self.shape() {
            return if offsets.iter().all(|&o| o == 0) {
                Ok(self.clone())
            } else {
                Err(IndexError::OutOfBounds.into())
            };
        }

        let start = self
            .layout
            .checked_offset(offsets)
            .ok_or(IndexError::OutOfBounds)?;
        self.derive(self.layout.with_parts(shape, strides, start)?)
    }

    fn check_matrix(&self, what: &str) -> Result<(), ArrayError> {
        if self.is_matrix() {
            Ok(())
        } else {
            Err(ArrayError::UnsupportedOperation(format!(
                "{} of array with rank {}",
                what,
                self.ndim()
            )))
        }
    }

    /// Return a view of row `r` of a matrix.
    pub fn get_row(&self, r: usize) -> Result<NdArray<T>, ArrayError> {
        self.check_matrix("row")?;
        self.slice_along(r, 0)
    }

    /// Return a view of column `c` of a matrix.
    pub fn get_column(&self, c: usize) -> Result<NdArray<T>, ArrayError> {
        self.check_matrix("column")?;
        self.slice_along(c, 1)
    }

    /// Return a new matrix holding copies of the given rows.
    pub fn get_rows(&self, rows: &[usize]) -> Result<NdArray<T>, ArrayError> {
        self.check_matrix("rows")?;
        let mut result = Self::zeros_with_order(&[rows.len(), self.columns()], self.order());
        for (i, &r) in rows.iter().enumerate() {
            result.put_row(i, &self.get_row(r)?)?;
        }
        Ok(result)
    }

    /// Return a new matrix holding copies of the given columns.
    pub fn get_columns(&self, columns: &[usize]) -> Result<NdArray<T>, ArrayError> {
        self.check_matrix("columns")?;
        let mut result = Self::zeros_with_order(&[self.rows(), columns.len()], self.order());
        for (i, &c) in columns.iter().enumerate() {
            result.put_column(i, &self.get_column(c)?)?;
        }
        Ok(result)
    }

    fn put_lane(&self, lane: NdArray<T>, source: &NdArray<T>) -> Result<(), ArrayError> {
        if source.len() != lane.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: lane.shape().to_vec(),
                actual: source.shape().to_vec(),
            });
        }
        let values = source.to_vec();
        lane.write_logical(&values);
        Ok(())
    }

    /// Copy the elements of `source` into row `r` of a matrix.
    pub fn put_row(&mut self, r: usize, source: &NdArray<T>) -> Result<(), ArrayError> {
        let row = self.get_row(r)?;
        self.put_lane(row, source)
    }

    /// Copy the elements of `source` into column `c` of a matrix.
    pub fn put_column(&mut self, c: usize, source: &NdArray<T>) -> Result<(), ArrayError> {
        let column = self.get_column(c)?;
        self.put_lane(column, source)
    }

    /// Copy `source` into slice `index` (along the first dimension) of this
    /// array.
    ///
    /// A scalar destination or vector destination accepts a single-element
    /// source. Vector and matrix sources must match the slice's shape.
    /// Higher-rank sources must have the same number of slices as the
    /// destination slice and are copied slice by slice.
    pub fn put_slice(&mut self, index: usize, source: &NdArray<T>) -> Result<(), ArrayError> {
        let single = |source: &NdArray<T>| -> Result<T, ArrayError> {
            if source.len() == 1 {
                source.get_linear(0)
            } else {
                Err(ArrayError::ShapeMismatch {
                    expected: vec![],
                    actual: source.shape().to_vec(),
                })
            }
        };

        match self.ndim() {
            0 => {
                if index != 0 {
                    return Err(IndexError::OutOfBounds.into());
                }
                let value = single(source)?;
                self.put_linear(0, value)
            }
            1 => {
                let value = single(source)?;
                self.put(&[index], value)
            }
            _ => {
                let mut view = self.slice(index)?;
                if source.is_scalar() {
                    if view.len() != 1 {
                        return Err(ArrayError::ShapeMismatch {
                            expected: view.shape().to_vec(),
                            actual: vec![],
                        });
                    }
                    return view.put_linear(0, single(source)?);
                }
                if source.ndim() <= 2 {
                    return view.assign(source);
                }
                if source.ndim() != view.ndim() {
                    return Err(ArrayError::ShapeMismatch {
                        expected: view.shape().to_vec(),
                        actual: source.shape().to_vec(),
                    });
                }
                if source.slices() != view.slices() {
                    return Err(ArrayError::SliceCountMismatch {
                        expected: view.slices(),
                        actual: source.slices(),
                    });
                }
                for i in 0..source.slices() {
                    view.put_slice(i, &source.slice(i)?)?;
                }
                Ok(())
            }
        }
    }

    /// Return the number of 1-D lanes along `dim`.
    pub fn vectors_along_dimension(&self, dim: usize) -> Result<usize, ArrayError> {
        if dim >= self.ndim() {
            return Err(ArrayError::InvalidDimension {
                dim,
                ndim: self.ndim(),
            });
        }
        Ok(remove_dim(self.shape(), dim).iter().product())
    }

    /// Return a view of the `index`-th 1-D lane along `dim`.
    ///
    /// Lanes are numbered in logical order of the remaining dimensions.
    pub fn vector_along_dimension(&self, index: usize, dim: usize) -> Result<NdArray<T>, ArrayError> {
        let count = self.vectors_along_dimension(dim)?;
        if index >= count {
            return Err(IndexError::OutOfBounds.into());
        }
        let outer = Layout::from_parts(
            &remove_dim(self.shape(), dim),
            &remove_dim(self.strides(), dim),
            self.offset(),
            self.order(),
        )?;
        let start = outer.linear_offset(index)?;
        self.derive(
            self.layout
                .with_parts(&[self.size(dim)], &[self.stride(dim)], start)?,
        )
    }

    /// Return an iterator over the multi-indices of this array in logical
    /// order.
    pub fn indices(&self) -> Indices {
        Indices::from_shape(self.shape())
    }

    fn check_same_shape(&self, other: &NdArray<T>) -> Result<(), ArrayError> {
        if self.shape() != other.shape() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: other.shape().to_vec(),
            });
        }
        Ok(())
    }

    /// Return the sum of squared magnitudes of elementwise differences.
    pub fn squared_distance(&self, other: &NdArray<T>) -> Result<f64, ArrayError> {
        self.check_same_shape(other)?;
        Ok(self
            .to_vec()
            .into_iter()
            .zip(other.to_vec())
            .map(|(a, b)| {
                let d = (a - b).magnitude();
                d * d
            })
            .sum())
    }

    /// Return the Euclidean distance between two arrays.
    pub fn distance2(&self, other: &NdArray<T>) -> Result<f64, ArrayError> {
        self.squared_distance(other).map(f64::sqrt)
    }

    /// Return the sum of magnitudes of elementwise differences.
    pub fn distance1(&self, other: &NdArray<T>) -> Result<f64, ArrayError> {
        self.check_same_shape(other)?;
        Ok(self
            .to_vec()
            .into_iter()
            .zip(other.to_vec())
            .map(|(a, b)| (a - b).magnitude())
            .sum())
    }
}

/// Arrays are equal if they have the same shape and every component of
/// corresponding elements differs by at most `1e-6`.
impl<T: Element> PartialEq for NdArray<T> {
    fn eq(&self, other: &NdArray<T>) -> bool {
        self.shape() == other.shape()
            && self
                .to_vec()
                .into_iter()
                .zip(other.to_vec())
                .all(|(a, b)| a.approx_eq(b, EQ_TOLERANCE))
    }
}

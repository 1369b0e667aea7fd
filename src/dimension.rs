//! Iteration over the 1-D lanes of an array along one dimension.
//!
//! [`DimensionIter`] yields one [`DimensionSlice`] per lane. Reductions and
//! caller-supplied operations ([`SliceOp`]) consume these slices, and
//! [`NdArray::iterate_over_dimension`] can write the results back into the
//! array.

use std::time::Instant;

use crate::array::NdArray;
use crate::element::Element;
use crate::env::{env_flag, VERBOSE_VAR};
use crate::errors::{ArrayError, IndexError};
use crate::index_iterator::Indices;
use crate::layout::{remove_dim, Dims, Order};

/// One lane of an array, materialized as a new 1-D array.
#[derive(Clone, Debug)]
pub struct DimensionSlice<T: Element> {
    /// True if this is the last lane within the current slice along
    /// dimension 0. Only set when iterating over a dimension other than 0 of
    /// an array with rank >= 2.
    pub crossed_slice_boundary: bool,

    /// Values of the lane. Operations may replace or modify this.
    pub result: NdArray<T>,

    /// Buffer slot positions of the lane's elements, in lane order. Write-back
    /// copies `result` to these positions. Operations may set this to `None`
    /// to suppress write-back.
    pub physical_indices: Option<Vec<usize>>,
}

/// An operation applied to each lane visited by
/// [`NdArray::iterate_over_dimension`].
pub trait SliceOp<T: Element> {
    fn operate(&mut self, slice: &mut DimensionSlice<T>);
}

impl<T: Element, F: FnMut(&mut DimensionSlice<T>)> SliceOp<T> for F {
    fn operate(&mut self, slice: &mut DimensionSlice<T>) {
        self(slice)
    }
}

/// Options that control dimension iteration.
#[derive(Clone, Debug, Default)]
pub struct IterOptions {
    /// Print details of each visited lane and a summary to stderr.
    pub verbose: bool,
}

impl IterOptions {
    /// Read options from environment variables.
    ///
    /// `NDVIEW_VERBOSE` enables verbose output.
    pub fn from_env() -> IterOptions {
        IterOptions {
            verbose: env_flag(VERBOSE_VAR, false),
        }
    }
}

/// Order in which lane start positions are produced.
#[derive(Clone, Debug)]
enum Walk {
    /// Lanes start at each position of a reduced layout, visited in logical
    /// order.
    Flat { starts: Indices, strides: Dims },

    /// Lanes are grouped by slice along dimension 0. `slice_starts` holds the
    /// position of each slice. Within a slice, lanes are visited in logical
    /// order of the remaining dimensions.
    Sliced {
        slice_starts: Vec<usize>,
        current: usize,
        inner_shape: Dims,
        inner_strides: Dims,
        inner: Indices,
    },
}

/// Iterator over the lanes of an array along one dimension.
///
/// Rank-specific rules:
///
/// - A scalar has a single lane of length 1. Only dimension 0 is valid.
/// - For a vector, dimension 0 yields the whole vector as one lane and
///   dimension 1 yields each element as its own lane.
/// - For rank >= 2, there is one lane per index of the shape with `dim`
///   removed, visited in logical order.
///
/// Created by [`NdArray::dimension_iter`].
#[derive(Clone, Debug)]
pub struct DimensionIter<T: Element> {
    array: NdArray<T>,
    walk: Walk,
    lane_len: usize,
    lane_stride: usize,
    remaining: usize,
}

impl<T: Element> DimensionIter<T> {
    fn new(array: &NdArray<T>, dim: usize) -> Result<DimensionIter<T>, ArrayError> {
        let ndim = array.ndim();
        let invalid = ArrayError::InvalidDimension { dim, ndim };
        let offset = array.offset();

        let flat = |starts: &[usize], strides: &[usize]| Walk::Flat {
            starts: Indices::from_shape(starts),
            strides: strides.iter().copied().collect(),
        };

        let (walk, lane_len, lane_stride, remaining) = match ndim {
            0 if dim == 0 => (flat(&[], &[]), 1, 1, 1),
            0 => return Err(invalid),
            1 => {
                let (size, stride) = (array.size(0), array.stride(0));
                match dim {
                    0 => (flat(&[], &[]), size, stride, 1),
                    1 => (flat(&[size], &[stride]), 1, stride, size),
                    _ => return Err(invalid),
                }
            }
            _ if dim >= ndim => return Err(invalid),
            _ => {
                let outer_shape = remove_dim(array.shape(), dim);
                let outer_strides = remove_dim(array.strides(), dim);
                let remaining: usize = outer_shape.iter().product();
                let walk = if dim == 0 {
                    flat(&outer_shape, &outer_strides)
                } else {
                    let slice_starts = (0..array.size(0))
                        .map(|i| offset + i * array.stride(0))
                        .collect();
                    let inner_shape: Dims = outer_shape[1..].iter().copied().collect();
                    Walk::Sliced {
                        slice_starts,
                        current: 0,
                        inner: Indices::from_shape(&inner_shape),
                        inner_shape,
                        inner_strides: outer_strides[1..].iter().copied().collect(),
                    }
                };
                (walk, array.size(dim), array.stride(dim), remaining)
            }
        };

        Ok(DimensionIter {
            array: array.clone(),
            walk,
            lane_len,
            lane_stride,
            remaining,
        })
    }

    /// Return the start position of the next lane and whether it is the last
    /// lane of its slice.
    fn next_start(&mut self) -> Option<(usize, bool)> {
        let offset = self.array.offset();
        match &mut self.walk {
            Walk::Flat { starts, strides } => {
                let index = starts.next()?;
                let start = offset
                    + index
                        .iter()
                        .zip(strides.iter())
                        .map(|(i, s)| i * s)
                        .sum::<usize>();
                Some((start, false))
            }
            Walk::Sliced {
                slice_starts,
                current,
                inner_shape,
                inner_strides,
                inner,
            } => {
                let slice_start = *slice_starts.get(*current)?;
                let index = inner.next()?;
                let start = slice_start
                    + index
                        .iter()
                        .zip(inner_strides.iter())
                        .map(|(i, s)| i * s)
                        .sum::<usize>();
                let crossed = inner.len() == 0;
                if crossed {
                    *current += 1;
                    *inner = Indices::from_shape(inner_shape);
                }
                Some((start, crossed))
            }
        }
    }
}

impl<T: Element> Iterator for DimensionIter<T> {
    type Item = DimensionSlice<T>;

    fn next(&mut self) -> Option<DimensionSlice<T>> {
        if self.remaining == 0 {
            return None;
        }
        let (start, crossed) = self.next_start()?;
        self.remaining -= 1;

        let offsets = (0..self.lane_len).map(|k| start + k * self.lane_stride);
        let values: Vec<T> = offsets.clone().map(|pos| self.array.read_at(pos)).collect();
        let physical = offsets.map(T::physical).collect();

        Some(DimensionSlice {
            crossed_slice_boundary: crossed,
            result: NdArray::from_logical(values.into_iter(), &[self.lane_len], Order::RowMajor),
            physical_indices: Some(physical),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Element> ExactSizeIterator for DimensionIter<T> {}

impl<T: Element> NdArray<T> {
    /// Return an iterator over the lanes of this array along `dim`.
    pub fn dimension_iter(&self, dim: usize) -> Result<DimensionIter<T>, ArrayError> {
        DimensionIter::new(self, dim)
    }

    /// Apply `op` to each lane along `dim`.
    ///
    /// If `modify` is true, the (possibly updated) result of each lane is
    /// written back to the positions the lane was read from, before the next
    /// lane is read.
    pub fn iterate_over_dimension(
        &mut self,
        dim: usize,
        op: &mut impl SliceOp<T>,
        modify: bool,
    ) -> Result<(), ArrayError> {
        self.iterate_with_options(dim, op, modify, &IterOptions::default())
    }

    /// Variant of [`iterate_over_dimension`](NdArray::iterate_over_dimension)
    /// which accepts options.
    pub fn iterate_with_options(
        &mut self,
        dim: usize,
        op: &mut impl SliceOp<T>,
        modify: bool,
        opts: &IterOptions,
    ) -> Result<(), ArrayError> {
        let start = opts.verbose.then(Instant::now);
        let mut count = 0;

        for mut slice in self.dimension_iter(dim)? {
            op.operate(&mut slice);

            if opts.verbose {
                eprintln!(
                    "dim {} lane {} len {} crossed {}",
                    dim,
                    count,
                    slice.result.len(),
                    slice.crossed_slice_boundary
                );
            }
            count += 1;

            if modify {
                if let Some(indices) = &slice.physical_indices {
                    self.write_back(&slice.result, indices)?;
                }
            }
        }

        if let Some(start) = start {
            eprintln!(
                "Iterated over {} lanes along dim {} of {:?} in {:.3}ms",
                count,
                dim,
                self.shape(),
                start.elapsed().as_secs_f64() * 1000.0
            );
        }

        Ok(())
    }

    fn write_back(&self, result: &NdArray<T>, indices: &[usize]) -> Result<(), ArrayError> {
        if result.len() < indices.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: vec![indices.len()],
                actual: result.shape().to_vec(),
            });
        }
        let values = result.to_vec();
        let mut slots = self.buffer().borrow_mut();
        let len = slots.len();
        if indices
            .iter()
            .any(|&pos| pos.checked_add(T::SLOTS).map_or(true, |end| end > len))
        {
            return Err(IndexError::OutOfBounds.into());
        }
        for (&pos, value) in indices.iter().zip(values) {
            T::write(&mut slots, pos, value);
        }
        Ok(())
    }
}

use std::iter::FusedIterator;

use smallvec::{smallvec, SmallVec};

/// Index type used when iterating over arrays.
pub type Index = SmallVec<[usize; 5]>;

/// Iterator over all multi-indices of a shape, in row-major order (the last
/// dimension advances fastest).
///
/// An empty shape yields a single empty index, matching the single element of
/// a rank-0 array. A shape with any zero-sized dimension yields nothing.
#[derive(Clone, Debug)]
pub struct Indices {
    shape: Index,
    next: Option<Index>,
    remaining: usize,
}

impl Indices {
    pub fn from_shape(shape: &[usize]) -> Indices {
        let remaining: usize = shape.iter().product();
        Indices {
            shape: shape.iter().copied().collect(),
            next: (remaining > 0).then(|| smallvec![0; shape.len()]),
            remaining,
        }
    }
}

impl Iterator for Indices {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        let current = self.next.take()?;
        self.remaining -= 1;

        if self.remaining > 0 {
            let mut next = current.clone();
            for (index, &size) in next.iter_mut().zip(self.shape.iter()).rev() {
                *index += 1;
                if *index < size {
                    break;
                }
                *index = 0;
            }
            self.next = Some(next);
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

impl FusedIterator for Indices {}

use std::fmt::{Debug, Error, Formatter};

use crate::array::NdArray;
use crate::element::Element;

/// Entry in the formatted representation of an array's data.
enum Entry<T: Debug> {
    Value(T),

    /// "..." used to elide long dimensions.
    Ellipsis,
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Entry::Value(val) => write!(f, "{:?}", val),
            Entry::Ellipsis => write!(f, "..."),
        }
    }
}

/// Maximum number of entries printed along each dimension before eliding.
const MAX_ENTRIES: usize = 10;

/// Format the elements of a vector as a list (`[0, 1, 2, ... n]`).
fn write_vector<T: Debug>(f: &mut Formatter<'_>, row: &[T], max: usize) -> Result<(), Error> {
    let len = row.len();
    let head = row.iter().take(max / 2);
    let tail = row.iter().skip(max / 2).skip(len.saturating_sub(max));

    let mut list = f.debug_list();
    list.entries(head.map(Entry::Value));
    if len > max {
        list.entry(&Entry::<T>::Ellipsis);
    }
    list.entries(tail.map(Entry::Value));
    list.finish()
}

/// Format an array of rank >= 1 as nested lists.
///
/// `depth` is the number of enclosing lists, used to indent rows after the
/// first.
fn write_nested<T: Element>(
    f: &mut Formatter<'_>,
    array: &NdArray<T>,
    depth: usize,
) -> Result<(), Error> {
    if array.ndim() == 1 {
        return write_vector(f, &array.to_vec(), MAX_ENTRIES);
    }

    let n = array.slices();
    let shown = n.min(MAX_ENTRIES);
    let separator = if array.ndim() > 2 { ",\n\n" } else { ",\n" };

    write!(f, "[")?;
    for i in 0..shown {
        if i > 0 {
            write!(f, "{}{}", separator, " ".repeat(depth + 1))?;
        }
        let slice = array.slice(i).map_err(|_| Error)?;
        write_nested(f, &slice, depth + 1)?;
    }
    if n > shown {
        write!(f, "{}{}...", separator, " ".repeat(depth + 1))?;
    }
    write!(f, "]")
}

impl<T: Element> Debug for NdArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.ndim() {
            0 => match self.item() {
                Some(item) => write!(f, "({:?})", item)?,
                None => write!(f, "()")?,
            },
            _ => write_nested(f, self, 0)?,
        }
        write!(
            f,
            ", shape={:?}, strides={:?}",
            self.shape(),
            self.strides()
        )
    }
}

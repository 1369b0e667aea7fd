use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Flat storage of `f64` slots shared by every view derived from it.
///
/// Cloning a `Buffer` creates another handle to the same storage, not a copy.
/// The storage lives as long as the longest-lived handle. Use
/// [`deep_clone`](Buffer::deep_clone) to get independent storage.
///
/// Buffers are never resized.
///
/// # Aliasing
///
/// Views that share a buffer observe each other's writes. Buffers are not
/// synchronized and cannot be sent between threads. Callers must not hold a
/// borrow from [`borrow`](Buffer::borrow) across a call that writes to the
/// same buffer.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    data: Rc<RefCell<Vec<f64>>>,
}

impl Buffer {
    /// Wrap an existing vector.
    pub fn from_vec(data: Vec<f64>) -> Buffer {
        Buffer {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Allocate a buffer of `len` zero slots.
    pub fn zeros(len: usize) -> Buffer {
        Self::from_vec(vec![0.; len])
    }

    /// Return the number of slots.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the slots for reading.
    pub fn borrow(&self) -> Ref<'_, Vec<f64>> {
        self.data.borrow()
    }

    /// Borrow the slots for writing.
    pub fn borrow_mut(&self) -> RefMut<'_, Vec<f64>> {
        self.data.borrow_mut()
    }

    /// Return true if `self` and `other` are handles to the same storage.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Return the number of live handles to this storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.data)
    }

    /// Copy the slots into new, independent storage.
    pub fn deep_clone(&self) -> Buffer {
        Self::from_vec(self.data.borrow().clone())
    }
}

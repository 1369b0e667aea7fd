//! Operations specific to arrays of complex numbers.

use num_complex::Complex64;

use crate::array::{ComplexArray, RealArray};
use crate::errors::ArrayError;

impl ComplexArray {
    /// Create a complex copy of a real array, with zero imaginary parts.
    pub fn from_real(real: &RealArray) -> ComplexArray {
        let values = real.to_vec().into_iter().map(|re| Complex64::new(re, 0.));
        ComplexArray::from_logical(values, real.shape(), real.order())
    }

    /// Create a complex array from separate real and imaginary parts.
    pub fn from_parts(real: &RealArray, imag: &RealArray) -> Result<ComplexArray, ArrayError> {
        if real.shape() != imag.shape() {
            return Err(ArrayError::ShapeMismatch {
                expected: real.shape().to_vec(),
                actual: imag.shape().to_vec(),
            });
        }
        let values = real
            .to_vec()
            .into_iter()
            .zip(imag.to_vec())
            .map(|(re, im)| Complex64::new(re, im));
        Ok(ComplexArray::from_logical(values, real.shape(), real.order()))
    }

    /// Return the real part of the element at `index`.
    pub fn get_real(&self, index: &[usize]) -> Result<f64, ArrayError> {
        self.get(index).map(|c| c.re)
    }

    /// Return the imaginary part of the element at `index`.
    pub fn get_imag(&self, index: &[usize]) -> Result<f64, ArrayError> {
        self.get(index).map(|c| c.im)
    }

    /// Set the real part of the element at `index`, leaving the imaginary part
    /// unchanged.
    pub fn put_real(&mut self, index: &[usize], value: f64) -> Result<(), ArrayError> {
        let offset = self.layout().offset_of(index)?;
        let mut elem = self.read_at(offset);
        elem.re = value;
        self.write_at(offset, elem);
        Ok(())
    }

    /// Set the imaginary part of the element at `index`, leaving the real part
    /// unchanged.
    pub fn put_imag(&mut self, index: &[usize], value: f64) -> Result<(), ArrayError> {
        let offset = self.layout().offset_of(index)?;
        let mut elem = self.read_at(offset);
        elem.im = value;
        self.write_at(offset, elem);
        Ok(())
    }

    /// Return a new real array holding the real parts of this view's
    /// elements.
    pub fn real(&self) -> RealArray {
        self.map_real(|c| c.re)
    }

    /// Return a new real array holding the imaginary parts of this view's
    /// elements.
    pub fn imag(&self) -> RealArray {
        self.map_real(|c| c.im)
    }

    fn map_real(&self, f: impl Fn(Complex64) -> f64) -> RealArray {
        let values = self.to_vec().into_iter().map(f);
        RealArray::from_logical(values, self.shape(), self.order())
    }

    /// Negate the imaginary part of every element in place.
    pub fn conji(&mut self) -> &mut ComplexArray {
        let offsets: Vec<usize> = self.layout().offsets().collect();
        for offset in offsets {
            let elem = self.read_at(offset);
            self.write_at(offset, elem.conj());
        }
        self
    }

    /// Return a conjugated copy of this view.
    pub fn conj(&self) -> ComplexArray {
        let mut result = self.dup();
        result.conji();
        result
    }

    /// Return the conjugate transpose of a matrix, as a new array.
    pub fn hermitian(&self) -> Result<ComplexArray, ArrayError> {
        if !self.is_matrix() {
            return Err(ArrayError::UnsupportedOperation(format!(
                "hermitian of array with rank {}",
                self.ndim()
            )));
        }
        let transposed = self.transpose()?;
        let values = transposed.to_vec().into_iter().map(|c| c.conj());
        Ok(ComplexArray::from_logical(
            values,
            transposed.shape(),
            self.order(),
        ))
    }
}

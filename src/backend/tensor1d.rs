use super::scalar::Scalar;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D storage (`B::Tensor1D`) and carries the
/// backend as a phantom type, so tensors from different backends cannot be
/// mixed.
///
/// # Precision semantics
/// - [`Tensor1D::new`] accepts `Vec<f32>` for ergonomic data loading
/// - [`Tensor1D::from_f64`] keeps full precision (targets, encodings)
/// - `to_vec()` returns `Vec<f64>`
///
/// # Example
/// ```
/// use targetenc_rs::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0f32, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
///
/// let y = x.add_scalar(&Scalar::<CpuBackend>::new(-2.0));
/// assert_eq!(y.to_vec(), vec![-1.0, 0.0, 1.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> std::fmt::Debug for Tensor1D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.to_vec()).finish()
    }
}

impl<B: Backend> Tensor1D<B> {
    fn wrap(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a new 1D tensor from `f32` values.
    pub fn new(data: Vec<f32>) -> Self {
        Self::wrap(B::from_vec_1d(data.into_iter().map(f64::from).collect()))
    }

    /// Creates a new 1D tensor from `f64` values without loss of precision.
    pub fn from_f64(data: Vec<f64>) -> Self {
        Self::wrap(B::from_vec_1d(data))
    }

    /// Creates a 1D tensor filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self::wrap(B::zeros_1d(len))
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self::wrap(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise `self * other`.
    pub fn mul(&self, other: &Self) -> Self {
        Self::wrap(B::mul_1d(&self.data, &other.data))
    }

    /// Adds `a` to every element.
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self::wrap(B::add_scalar_1d(&self.data, &a.data))
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_all_1d(&self.data))
    }

    /// Arithmetic mean of all elements (NaN when empty).
    pub fn mean(&self) -> Scalar<B> {
        Scalar::from_raw(B::mean_all_1d(&self.data))
    }

    /// Population variance (`ddof = 0`); NaN when empty.
    pub fn variance(&self) -> Scalar<B> {
        let centered = self.add_scalar(&Scalar::new(-self.mean().to_f64()));
        centered.mul(&centered).mean()
    }

    /// Inner product with another tensor of the same length.
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        self.mul(other).sum()
    }

    /// Returns the elements at `indices`, in order.
    pub fn select(&self, indices: &[usize]) -> Result<Self, PreprocessingError> {
        let len = self.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("index < {}", len),
                got: bad.to_string(),
            });
        }
        Ok(Self::wrap(B::select_1d(&self.data, indices)))
    }

    /// Copies the tensor into a host vector.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` when the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor1d_arithmetic() {
        let a = Tensor1D::<CpuBackend>::new(vec![5.0, 7.0, 9.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0, 4.0]);

        assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(a.mul(&b).to_vec(), vec![10.0, 21.0, 36.0]);
        assert_eq!(a.dot(&b).to_f64(), 67.0);
        assert_eq!(
            a.add_scalar(&Scalar::new(-5.0)).to_vec(),
            vec![0.0, 2.0, 4.0]
        );
    }

    #[test]
    fn test_tensor1d_reductions() {
        let t = Tensor1D::<CpuBackend>::from_f64(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.sum().to_f64(), 10.0);
        assert!((t.mean().to_f64() - 2.5).abs() < 1e-12);
        // population variance of 1..4 is 1.25
        assert!((t.variance().to_f64() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_tensor1d_empty_mean_is_nan() {
        let t = Tensor1D::<CpuBackend>::zeros(0);
        assert!(t.is_empty());
        assert!(t.mean().to_f64().is_nan());
    }

    #[test]
    fn test_tensor1d_select() {
        let t = Tensor1D::<CpuBackend>::from_f64(vec![10.0, 20.0, 30.0]);
        assert_eq!(t.select(&[2, 0]).unwrap().to_vec(), vec![30.0, 10.0]);
        assert!(matches!(
            t.select(&[3]),
            Err(PreprocessingError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_tensor1d_f64_precision_is_kept() {
        let v = 0.1f64 + 0.2f64;
        let t = Tensor1D::<CpuBackend>::from_f64(vec![v]);
        assert_eq!(t.to_vec()[0], v);
    }
}

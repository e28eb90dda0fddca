//! # Backend Abstraction
//!
//! Tensor storage and the handful of numerical primitives the encoders,
//! discretizers and linear solvers are written against.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations the estimators in this crate
//!   actually call are part of [`Backend`].
//! - **Zero-cost generics**: backend selection happens at compile time via type
//!   parameters, so there is no runtime dispatch.
//! - **Type-safe tensor handling**: [`Tensor1D`], [`Tensor2D`] and [`Scalar`] carry
//!   their backend as a phantom type, so tensors from different backends never mix.
//! - **Feature-gated implementations**: `CpuBackend` lives behind the default `cpu`
//!   feature.
//!
//! ## Example
//!
//! ```rust
//! use targetenc_rs::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.5, 0.5]);
//!
//! let y = x.dot(&w);
//! assert_eq!(y.to_vec(), vec![1.5, 3.5]);
//! ```

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::CpuBackend;

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and computation primitives.
///
/// Implementations provide concrete 1D/2D storage and the operations below.
/// Index and shape validation is the job of the typed wrappers
/// ([`Tensor1D`], [`Tensor2D`]); backend functions may assume valid input.
///
/// # Safety Guarantees
///
/// - Tensor types are `Clone + Send + Sync` for safe concurrent usage
/// - 2D data is row-major
pub trait Backend: Clone + Copy + std::fmt::Debug + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps + Clone + std::fmt::Debug;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Element-wise operations (1D) ---

    /// Element-wise subtraction of two 1D tensors of equal length.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise multiplication of two 1D tensors of equal length.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Reductions ---

    /// Sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Arithmetic mean of all elements in a 1D tensor (NaN when empty).
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Mean of each column of a 2D tensor.
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Minimum of each column of a 2D tensor.
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Maximum of each column of a 2D tensor.
    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Data access ---

    /// Copies a 1D tensor into a host vector.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Copies a 2D tensor into a host vector in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    // --- Linear algebra ---

    /// Computes `A · x` for `A` of shape (m × n) and `x` of length n.
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Computes `Aᵀ · x` for `A` of shape (m × n) and `x` of length m.
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Returns the Gram matrix `Aᵀ · A` with shape (n × n).
    fn gram_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    // --- Selection ---

    /// Gathers the given elements of a 1D tensor, in order.
    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D;

    /// Gathers the given rows of a 2D tensor, in order.
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D;

    /// Gathers the given columns of a 2D tensor, in order.
    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D;
}

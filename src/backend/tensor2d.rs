use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed, row-major 2D tensor (samples × features).
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> std::fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rows, cols) = self.shape();
        f.debug_struct("Tensor2D")
            .field("rows", &rows)
            .field("cols", &cols)
            .finish()
    }
}

impl<B: Backend> Tensor2D<B> {
    fn wrap(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a tensor from row-major `f32` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self::from_f64(data.into_iter().map(f64::from).collect(), rows, cols)
    }

    /// Creates a tensor from row-major `f64` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn from_f64(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::wrap(B::from_vec_2d(data, rows, cols))
    }

    /// Builds a tensor from equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, PreprocessingError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} columns per row", cols),
                got: format!("{} columns", bad.len()),
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Ok(Self::from_f64(data, rows.len(), cols))
    }

    /// Creates a tensor filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::wrap(B::zeros_2d(rows, cols))
    }

    /// Matrix-vector product `self · w`.
    ///
    /// # Panics
    /// If `self.cols() != w.len()`.
    pub fn dot(&self, w: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec(&self.data, &w.data),
            backend: PhantomData,
        }
    }

    /// Transposed matrix-vector product `selfᵀ · v`.
    ///
    /// # Panics
    /// If `self.rows() != v.len()`.
    pub fn tdot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec_transposed(&self.data, &v.data),
            backend: PhantomData,
        }
    }

    /// Gram matrix `selfᵀ · self`.
    pub fn gram(&self) -> Self {
        Self::wrap(B::gram_2d(&self.data))
    }

    /// Column means.
    pub fn col_mean(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_mean_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Column minima.
    pub fn col_min(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_min_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Column maxima.
    pub fn col_max(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::col_max_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Gathers rows by index, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self, PreprocessingError> {
        let (n_rows, _) = self.shape();
        check_indices(rows, n_rows, "row")?;
        Ok(Self::wrap(B::select_rows_2d(&self.data, rows)))
    }

    /// Extracts one column as a 1D tensor.
    pub fn column_at(&self, col: usize) -> Result<Tensor1D<B>, PreprocessingError> {
        let (_, n_cols) = self.shape();
        check_indices(&[col], n_cols, "column")?;
        let selected = Self::wrap(B::select_columns_2d(&self.data, &[col]));
        Ok(Tensor1D::from_f64(selected.ravel()))
    }

    /// Copies the data into a host vector in row-major order.
    pub fn ravel(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Number of rows (samples).
    pub fn n_rows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns (features).
    pub fn n_cols(&self) -> usize {
        self.shape().1
    }
}

fn check_indices(indices: &[usize], bound: usize, what: &str) -> Result<(), PreprocessingError> {
    match indices.iter().find(|&&i| i >= bound) {
        Some(&bad) => Err(PreprocessingError::InvalidShape {
            expected: format!("{} index < {}", what, bound),
            got: bad.to_string(),
        }),
        None => Ok(()),
    }
}

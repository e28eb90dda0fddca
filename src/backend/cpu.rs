use super::Backend;

/// Pure-Rust CPU backend storing everything as `f64`.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.0[row * self.2 + col]
    }
}

impl CpuBackend {
    fn col_fold(t: &CpuTensor2D, init: f64, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let CpuTensor2D(data, rows, cols) = t;
        let mut out = vec![init; *cols];
        for row in 0..*rows {
            for (col, acc) in out.iter_mut().enumerate() {
                *acc = f(*acc, data[row * cols + col]);
            }
        }
        out
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let n = t.1 as f64;
        Self::col_fold(t, 0.0, |acc, x| acc + x)
            .into_iter()
            .map(|s| s / n)
            .collect()
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        Self::col_fold(t, f64::INFINITY, f64::min)
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        Self::col_fold(t, f64::NEG_INFINITY, f64::max)
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*cols, x.len(), "matvec: A.cols() != x.len()");
        (0..*rows)
            .map(|i| {
                data[i * cols..(i + 1) * cols]
                    .iter()
                    .zip(x.iter())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*rows, x.len(), "matvec_transposed: A.rows() != x.len()");
        let mut out = vec![0.0; *cols];
        for (i, &xi) in x.iter().enumerate() {
            let row = &data[i * cols..(i + 1) * cols];
            for (o, &v) in out.iter_mut().zip(row) {
                *o += v * xi;
            }
        }
        out
    }

    fn gram_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        let CpuTensor2D(data, rows, cols) = t;
        let mut out = vec![0.0; cols * cols];
        for r in 0..*rows {
            let row = &data[r * cols..(r + 1) * cols];
            for i in 0..*cols {
                let ri = row[i];
                if ri == 0.0 {
                    continue;
                }
                for j in i..*cols {
                    out[i * cols + j] += ri * row[j];
                }
            }
        }
        // mirror the upper triangle
        for i in 0..*cols {
            for j in 0..i {
                out[i * cols + j] = out[j * cols + i];
            }
        }
        CpuTensor2D::new(out, *cols, *cols)
    }

    fn select_1d(t: &Self::Tensor1D, indices: &[usize]) -> Self::Tensor1D {
        indices.iter().map(|&i| t[i]).collect()
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        let cols = t.2;
        let mut out = Vec::with_capacity(rows.len() * cols);
        for &r in rows {
            out.extend_from_slice(&t.0[r * cols..(r + 1) * cols]);
        }
        CpuTensor2D::new(out, rows.len(), cols)
    }

    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D {
        let rows = t.1;
        let mut out = Vec::with_capacity(rows * columns.len());
        for r in 0..rows {
            for &c in columns {
                out.push(t.at(r, c));
            }
        }
        CpuTensor2D::new(out, rows, columns.len())
    }
}

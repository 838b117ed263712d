//! linalg::convert — copies between `ndarray` and `nalgebra` storage.
//!
//! The public surface of this crate speaks `ndarray`, while the dense
//! decompositions (SVD, symmetric eigen) come from `nalgebra`. These
//! helpers are the only place the two layouts meet: `Array2` is row-major,
//! `DMatrix` is column-major, so every copy is element-wise and never
//! reinterprets the underlying buffer.
use nalgebra::DMatrix;
use ndarray::Array2;

/// Copy an `n×k` `ndarray` matrix into a freshly allocated `DMatrix`.
///
/// Writes proceed column by column to match the column-major storage of
/// `DMatrix`.
pub fn to_dmatrix(x: &Array2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = x.dim();
    let mut out = DMatrix::<f64>::zeros(nrows, ncols);
    for j in 0..ncols {
        for i in 0..nrows {
            out[(i, j)] = x[[i, j]];
        }
    }
    out
}

/// Copy a `DMatrix` back into a row-major `Array2`.
pub fn from_dmatrix(x: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((x.nrows(), x.ncols()), |(i, j)| x[(i, j)])
}

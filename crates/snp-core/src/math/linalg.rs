//! Linear algebra operations
//!
//! Complex matrix inverse and determinant with nalgebra as the backend.
//! All ndarray <-> nalgebra conversions are contained here.

use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::constants::NEAR_ZERO;

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert an ndarray complex view to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: ArrayView2<'_, Complex64>) -> DMatrix<nalgebra::Complex<f64>> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im))
}

/// Convert nalgebra DMatrix<Complex<f64>> to ndarray Array2<Complex64>
#[inline]
fn from_na_complex(m: &DMatrix<nalgebra::Complex<f64>>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| {
        Complex64::new(m[(i, j)].re, m[(i, j)].im)
    })
}

// ============================================================================
// Determinant and inversion
// ============================================================================

/// Determinant of a square complex matrix
///
/// Returns None for non-square or empty input.
pub fn det_complex(a: ArrayView2<'_, Complex64>) -> Option<Complex64> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }
    let d = to_na_complex(a).determinant();
    Some(Complex64::new(d.re, d.im))
}

/// Invert a complex matrix
///
/// Returns None if the matrix is non-square, empty, has a determinant
/// magnitude below [`NEAR_ZERO`] or if the LU inverse fails.
pub fn inv_complex(a: ArrayView2<'_, Complex64>) -> Option<Array2<Complex64>> {
    if det_complex(a)?.norm() < NEAR_ZERO {
        return None;
    }
    to_na_complex(a).try_inverse().map(|inv| from_na_complex(&inv))
}

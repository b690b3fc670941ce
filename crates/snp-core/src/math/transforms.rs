//! Network parameter transformation functions
//!
//! Batched conversions between S, Z, Y, ABCD, h, g and T parameters.
//! Every batch has shape `[nfreq, nports, nports]` and every point is
//! converted independently. The reference impedance is always passed in
//! explicitly as a real, positive `z0`.
//!
//! Singular matrices are handled per family:
//! - [`s2z`] fails the whole batch on the first singular `I - S`.
//! - [`z2s`], [`s2y`] and [`y2s`] fill the affected point with `Inf + jInf`
//!   and keep going.
//! - The 2-port-only formulas report a zero denominator as an error.

use ndarray::{s, Array2, Array3, ArrayView2};
use num_complex::Complex64;
use thiserror::Error;

use super::linalg::inv_complex;
use crate::constants::NEAR_ZERO;

/// Parameter conversion errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("input contains no frequency points")]
    EmptyInput,

    #[error("parameter matrices must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("reference impedance must be positive and finite, got {0}")]
    InvalidReferenceImpedance(f64),

    #[error("singular matrix ({what}) at frequency index {index}")]
    SingularMatrix { index: usize, what: &'static str },

    #[error("{quantity} is zero at frequency index {index}; {family} parameters are undefined")]
    ZeroDenominator {
        index: usize,
        quantity: &'static str,
        family: &'static str,
    },

    #[error("{family} parameters are only defined for 2-port networks, got {nports} ports")]
    UnsupportedPortCount { family: &'static str, nports: usize },

    #[error("non-finite input at frequency index {index}")]
    NonFiniteInput { index: usize },
}

/// What to do with a point whose matrix cannot be inverted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingularPolicy {
    FailFast,
    FillInfinite,
}

const INF: Complex64 = Complex64::new(f64::INFINITY, f64::INFINITY);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const TWO: Complex64 = Complex64::new(2.0, 0.0);

// ============================================================================
// Batch plumbing
// ============================================================================

/// Validate batch shape and return (nfreq, nports)
fn check_batch(p: &Array3<Complex64>) -> Result<(usize, usize), ConversionError> {
    let (nfreq, rows, cols) = p.dim();
    if nfreq == 0 {
        return Err(ConversionError::EmptyInput);
    }
    if rows != cols || rows == 0 {
        return Err(ConversionError::NotSquare { rows, cols });
    }
    Ok((nfreq, rows))
}

fn check_z0(z0: f64) -> Result<(), ConversionError> {
    if z0.is_finite() && z0 > 0.0 {
        Ok(())
    } else {
        Err(ConversionError::InvalidReferenceImpedance(z0))
    }
}

fn invert_at(
    index: usize,
    m: &Array2<Complex64>,
    what: &'static str,
) -> Result<Array2<Complex64>, ConversionError> {
    inv_complex(m.view()).ok_or(ConversionError::SingularMatrix { index, what })
}

/// Apply `op` to every frequency point, aggregating singular points per `policy`
fn map_points<F>(
    input: &Array3<Complex64>,
    policy: SingularPolicy,
    op: F,
) -> Result<Array3<Complex64>, ConversionError>
where
    F: Fn(usize, ArrayView2<'_, Complex64>) -> Result<Array2<Complex64>, ConversionError>,
{
    let (nfreq, nports) = check_batch(input)?;
    let mut out = Array3::<Complex64>::zeros((nfreq, nports, nports));

    for f in 0..nfreq {
        match op(f, input.slice(s![f, .., ..])) {
            Ok(m) => out.slice_mut(s![f, .., ..]).assign(&m),
            Err(ConversionError::SingularMatrix { index, what })
                if policy == SingularPolicy::FillInfinite =>
            {
                tracing::warn!(index, what, "singular matrix, filling point with Inf + jInf");
                out.slice_mut(s![f, .., ..]).fill(INF);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(out)
}

fn require_two_port(p: &Array3<Complex64>, family: &'static str) -> Result<(), ConversionError> {
    let (_, nports) = check_batch(p)?;
    if nports != 2 {
        return Err(ConversionError::UnsupportedPortCount { family, nports });
    }
    Ok(())
}

/// Apply a closed-form 2-port formula to every point
///
/// Points are passed as `[m11, m12, m21, m22]`.
fn map_two_port<F>(
    input: &Array3<Complex64>,
    family: &'static str,
    op: F,
) -> Result<Array3<Complex64>, ConversionError>
where
    F: Fn(usize, [Complex64; 4]) -> Result<[Complex64; 4], ConversionError>,
{
    require_two_port(input, family)?;
    let nfreq = input.dim().0;
    let mut out = Array3::<Complex64>::zeros((nfreq, 2, 2));

    for f in 0..nfreq {
        let m = [
            input[[f, 0, 0]],
            input[[f, 0, 1]],
            input[[f, 1, 0]],
            input[[f, 1, 1]],
        ];
        if m.iter().any(|v| !v.is_finite()) {
            return Err(ConversionError::NonFiniteInput { index: f });
        }
        let [r11, r12, r21, r22] = op(f, m)?;
        out[[f, 0, 0]] = r11;
        out[[f, 0, 1]] = r12;
        out[[f, 1, 0]] = r21;
        out[[f, 1, 1]] = r22;
    }

    Ok(out)
}

fn nonzero(
    v: Complex64,
    index: usize,
    quantity: &'static str,
    family: &'static str,
) -> Result<Complex64, ConversionError> {
    if v.norm() < NEAR_ZERO {
        Err(ConversionError::ZeroDenominator {
            index,
            quantity,
            family,
        })
    } else {
        Ok(v)
    }
}

// ============================================================================
// N-port: S <-> Z <-> Y
// ============================================================================

/// Convert S-parameters to Z-parameters
///
/// Formula: Z = z0 * (I + S) * inv(I - S)
///
/// Fails on the first point where `|det(I - S)| < 1e-15`.
pub fn s2z(s: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    let identity = Array2::<Complex64>::eye(s.dim().1);
    map_points(s, SingularPolicy::FailFast, |f, s_f| {
        let inv = invert_at(f, &(&identity - &s_f), "I - S")?;
        Ok((&identity + &s_f).dot(&inv) * z0)
    })
}

/// Convert Z-parameters to S-parameters
///
/// Formula: S = (Z - z0 I) * inv(Z + z0 I)
///
/// Points where `Z + z0 I` is singular are filled with `Inf + jInf`.
pub fn z2s(z: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    let z0_diag = Array2::<Complex64>::eye(z.dim().1) * z0;
    map_points(z, SingularPolicy::FillInfinite, |f, z_f| {
        let inv = invert_at(f, &(&z_f + &z0_diag), "Z + z0 I")?;
        Ok((&z_f - &z0_diag).dot(&inv))
    })
}

/// Convert S-parameters to Y-parameters
///
/// Formula: Y = (I - S) * inv(I + S) / z0
///
/// Points where `I + S` is singular are filled with `Inf + jInf`.
pub fn s2y(s: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    let identity = Array2::<Complex64>::eye(s.dim().1);
    map_points(s, SingularPolicy::FillInfinite, |f, s_f| {
        let inv = invert_at(f, &(&identity + &s_f), "I + S")?;
        Ok((&identity - &s_f).dot(&inv) / z0)
    })
}

/// Convert Y-parameters to S-parameters
///
/// Formula: S = (I - z0 Y) * inv(I + z0 Y)
///
/// Points where `I + z0 Y` is singular are filled with `Inf + jInf`.
pub fn y2s(y: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    let identity = Array2::<Complex64>::eye(y.dim().1);
    map_points(y, SingularPolicy::FillInfinite, |f, y_f| {
        let z0y = &y_f * z0;
        let inv = invert_at(f, &(&identity + &z0y), "I + z0 Y")?;
        Ok((&identity - &z0y).dot(&inv))
    })
}

// ============================================================================
// 2-port: ABCD and T
// ============================================================================

/// Convert S-parameters to ABCD (chain) parameters
///
/// The result is normalized: B is in units of `z0` and C in units of
/// `1/z0`. `z0` is only validated.
pub fn s2abcd(s: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    map_two_port(s, "ABCD", |f, [s11, s12, s21, s22]| {
        let den = TWO * nonzero(s21, f, "S21", "ABCD")?;
        let a = ((ONE + s11) * (ONE - s22) + s12 * s21) / den;
        let b = ((ONE + s11) * (ONE + s22) - s12 * s21) / den;
        let c = ((ONE - s11) * (ONE - s22) - s12 * s21) / den;
        let d = ((ONE - s11) * (ONE + s22) + s12 * s21) / den;
        Ok([a, b, c, d])
    })
}

/// Convert normalized ABCD (chain) parameters to S-parameters
pub fn abcd2s(abcd: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    check_z0(z0)?;
    map_two_port(abcd, "S", |f, [a, b, c, d]| {
        let den = nonzero(a + b + c + d, f, "A + B + C + D", "S")?;
        Ok([
            (a + b - c - d) / den,
            TWO * (a * d - b * c) / den,
            TWO / den,
            (-a + b - c + d) / den,
        ])
    })
}

/// Convert S-parameters to T (scattering transfer) parameters
pub fn s2t(s: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(s, "T", |f, [s11, s12, s21, s22]| {
        let s21 = nonzero(s21, f, "S21", "T")?;
        let det = s11 * s22 - s12 * s21;
        Ok([-det / s21, s11 / s21, -s22 / s21, ONE / s21])
    })
}

/// Convert T (scattering transfer) parameters to S-parameters
pub fn t2s(t: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(t, "S", |f, [t11, t12, t21, t22]| {
        let t22 = nonzero(t22, f, "T22", "S")?;
        let det = t11 * t22 - t12 * t21;
        Ok([t12 / t22, det / t22, ONE / t22, -t21 / t22])
    })
}

// ============================================================================
// 2-port: hybrid (h) and inverse hybrid (g)
// ============================================================================

/// Convert Z-parameters to h (hybrid) parameters
pub fn z2h(z: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(z, "H", |f, [z11, z12, z21, z22]| {
        let z22 = nonzero(z22, f, "Z22", "H")?;
        let det = z11 * z22 - z12 * z21;
        Ok([det / z22, z12 / z22, -z21 / z22, ONE / z22])
    })
}

/// Convert h (hybrid) parameters to Z-parameters
pub fn h2z(h: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(h, "Z", |f, [h11, h12, h21, h22]| {
        let h22 = nonzero(h22, f, "H22", "Z")?;
        let det = h11 * h22 - h12 * h21;
        Ok([det / h22, h12 / h22, -h21 / h22, ONE / h22])
    })
}

/// Convert Y-parameters to g (inverse hybrid) parameters
pub fn y2g(y: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(y, "G", |f, [y11, y12, y21, y22]| {
        let y11 = nonzero(y11, f, "Y11", "G")?;
        let det = y11 * y22 - y12 * y21;
        Ok([ONE / y11, -y12 / y11, y21 / y11, det / y11])
    })
}

/// Convert g (inverse hybrid) parameters to Y-parameters
pub fn g2y(g: &Array3<Complex64>) -> Result<Array3<Complex64>, ConversionError> {
    map_two_port(g, "Y", |f, [g11, g12, g21, g22]| {
        let g11 = nonzero(g11, f, "G11", "Y")?;
        let det = g11 * g22 - g12 * g21;
        Ok([ONE / g11, -g12 / g11, g21 / g11, det / g11])
    })
}

/// Convert S-parameters to h parameters through Z
pub fn s2h(s: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    require_two_port(s, "H")?;
    z2h(&s2z(s, z0)?)
}

/// Convert h parameters to S-parameters through Z
pub fn h2s(h: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    require_two_port(h, "S")?;
    z2s(&h2z(h)?, z0)
}

/// Convert S-parameters to g parameters through Y
pub fn s2g(s: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    require_two_port(s, "G")?;
    y2g(&s2y(s, z0)?)
}

/// Convert g parameters to S-parameters through Y
pub fn g2s(g: &Array3<Complex64>, z0: f64) -> Result<Array3<Complex64>, ConversionError> {
    require_two_port(g, "S")?;
    y2s(&g2y(g)?, z0)
}

//! Phase unwrapping and numerical differentiation
//!
//! These kernels back the group delay and phase traces on [`crate::Network`].
//! They operate on plain slices and never fail. Degenerate input yields an
//! empty result or `None`.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Unwrap a phase sequence with the given period
///
/// Any jump larger than half a period between neighbouring samples is
/// removed by adding a multiple of the period. A jump of exactly +half a
/// period is kept as is.
fn unwrap_with_period(phase: &[f64], period: f64) -> Vec<f64> {
    let Some(&first) = phase.first() else {
        return Vec::new();
    };
    let half = period / 2.0;

    let mut out = Vec::with_capacity(phase.len());
    out.push(first);
    let mut correction = 0.0;

    for w in phase.windows(2) {
        let dd = w[1] - w[0];
        let mut ddmod = (dd + half).rem_euclid(period) - half;
        if ddmod == -half && dd > 0.0 {
            ddmod = half;
        }
        if dd.abs() >= half {
            correction += ddmod - dd;
        }
        out.push(w[1] + correction);
    }

    out
}

/// Unwrap phase in radians (period 2π)
///
/// # Example
/// ```
/// use snp_core::math::phase::unwrap_phase;
/// let unwrapped = unwrap_phase(&[3.0, -3.0]);
/// assert!((unwrapped[1] - (2.0 * std::f64::consts::PI - 3.0)).abs() < 1e-12);
/// ```
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    unwrap_with_period(phase, 2.0 * PI)
}

/// Unwrap phase in degrees (period 360)
pub fn unwrap_phase_deg(phase: &[f64]) -> Vec<f64> {
    unwrap_with_period(phase, 360.0)
}

/// Numerical gradient dy/dx on a possibly non-uniform grid
///
/// Interior points use the second-order centered difference for uneven
/// spacing. The endpoints use first-order forward and backward differences.
/// Returns an empty vector when fewer than 2 points are given or the lengths
/// differ.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n < 2 || x.len() != n {
        return Vec::new();
    }

    let mut grad = vec![0.0; n];
    grad[0] = (y[1] - y[0]) / (x[1] - x[0]);
    grad[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);

    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        grad[i] = (hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1])
            / (hs * hd * (hd + hs));
    }

    grad
}

/// Group delay τ = -dφ/dω of a complex trace
///
/// `f` holds frequencies in Hz. The phase is unwrapped before
/// differentiation. Returns `None` when fewer than 2 points are given or the
/// lengths differ.
pub fn group_delay(f: &[f64], values: &[Complex64]) -> Option<Vec<f64>> {
    if values.len() < 2 || f.len() != values.len() {
        return None;
    }

    let phase: Vec<f64> = values.iter().map(|v| v.arg()).collect();
    let unwrapped = unwrap_phase(&phase);
    let omega: Vec<f64> = f.iter().map(|&x| 2.0 * PI * x).collect();

    Some(gradient(&unwrapped, &omega).into_iter().map(|d| -d).collect())
}

/// Linear interpolation of `yp(xp)` at `x`, clamping outside `[xp0, xpN]`
///
/// `xp` must be increasing and the same length as `yp`.
pub fn interp(x: &[f64], xp: &[f64], yp: &[f64]) -> Vec<f64> {
    if xp.is_empty() || xp.len() != yp.len() {
        return Vec::new();
    }
    let last = xp.len() - 1;

    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return yp[0];
            }
            if xi >= xp[last] {
                return yp[last];
            }
            let hi = xp.partition_point(|&v| v <= xi).min(last);
            let lo = hi - 1;
            let t = (xi - xp[lo]) / (xp[hi] - xp[lo]);
            yp[lo] + t * (yp[hi] - yp[lo])
        })
        .collect()
}

//! Derived network quantities
//!
//! Scalar traces (dB, magnitude, phase), group delay, and linear phase
//! analysis for a single `[port_out, port_in]` entry.

use serde::{Deserialize, Serialize};

use super::core::Network;
use super::error::NetworkError;
use crate::math::conversions::{complex_2_db, complex_2_degree, complex_2_magnitude};
use crate::math::phase::{self, unwrap_phase, unwrap_phase_deg};

/// Statistics of the deviation from a linear phase fit, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseErrorStats {
    pub max: f64,
    pub min: f64,
    pub peak_to_peak: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std: f64,
    pub rms: f64,
}

impl PhaseErrorStats {
    /// Returns `None` for an empty slice
    pub fn from_residuals(residuals: &[f64]) -> Option<Self> {
        if residuals.is_empty() {
            return None;
        }
        let n = residuals.len() as f64;

        let max = residuals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = residuals.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = residuals.iter().sum::<f64>() / n;
        let var = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let rms = (residuals.iter().map(|r| r * r).sum::<f64>() / n).sqrt();

        let mut sorted = residuals.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            max,
            min,
            peak_to_peak: max - min,
            mean,
            median,
            std: var.sqrt(),
            rms,
        })
    }
}

/// Least-squares line through unwrapped phase (degrees) versus frequency (Hz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPhaseFit {
    /// Degrees per Hz
    pub slope: f64,
    /// Degrees
    pub intercept: f64,
    pub r_squared: f64,
    /// Measured minus fitted phase at each point, in degrees
    pub residuals: Vec<f64>,
    pub stats: PhaseErrorStats,
}

impl LinearPhaseFit {
    /// Fit `y = slope * x + intercept`
    ///
    /// Needs at least 2 points and a non-constant `x`.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len();
        if n < 2 || y.len() != n {
            return None;
        }
        let nf = n as f64;
        let x_mean = x.iter().sum::<f64>() / nf;
        let y_mean = y.iter().sum::<f64>() / nf;

        let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return None;
        }
        let sxy: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let residuals: Vec<f64> = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| yi - (slope * xi + intercept))
            .collect();

        let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
        let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
        // a constant phase is fitted exactly by a flat line
        let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        let stats = PhaseErrorStats::from_residuals(&residuals)?;
        Some(Self {
            slope,
            intercept,
            r_squared,
            residuals,
            stats,
        })
    }
}

impl Network {
    /// Magnitude in dB, floored at -240 dB
    pub fn db(&self, port_out: usize, port_in: usize) -> Result<Vec<f64>, NetworkError> {
        Ok(self
            .trace(port_out, port_in)?
            .into_iter()
            .map(complex_2_db)
            .collect())
    }

    /// Linear magnitude
    pub fn magnitude(&self, port_out: usize, port_in: usize) -> Result<Vec<f64>, NetworkError> {
        Ok(self
            .trace(port_out, port_in)?
            .into_iter()
            .map(complex_2_magnitude)
            .collect())
    }

    /// Phase in radians, optionally unwrapped
    pub fn phase_rad(
        &self,
        port_out: usize,
        port_in: usize,
        unwrap: bool,
    ) -> Result<Vec<f64>, NetworkError> {
        let phase: Vec<f64> = self
            .trace(port_out, port_in)?
            .iter()
            .map(|v| v.arg())
            .collect();
        Ok(if unwrap { unwrap_phase(&phase) } else { phase })
    }

    /// Phase in degrees, optionally unwrapped
    pub fn phase_deg(
        &self,
        port_out: usize,
        port_in: usize,
        unwrap: bool,
    ) -> Result<Vec<f64>, NetworkError> {
        let phase: Vec<f64> = self
            .trace(port_out, port_in)?
            .into_iter()
            .map(complex_2_degree)
            .collect();
        Ok(if unwrap { unwrap_phase_deg(&phase) } else { phase })
    }

    /// Group delay in seconds of the `[port_out, port_in]` entry
    ///
    /// τ = -dφ/dω with the phase unwrapped first. Interior points use a
    /// centered difference, the two ends use one-sided differences.
    pub fn group_delay(&self, port_out: usize, port_in: usize) -> Result<Vec<f64>, NetworkError> {
        let trace = self.trace(port_out, port_in)?;
        phase::group_delay(self.f(), &trace).ok_or(NetworkError::InsufficientPoints {
            needed: 2,
            got: self.nfreq(),
        })
    }

    /// Fit a line to the unwrapped phase and report the deviation from it
    pub fn linear_phase_fit(
        &self,
        port_out: usize,
        port_in: usize,
    ) -> Result<LinearPhaseFit, NetworkError> {
        let phase = self.phase_deg(port_out, port_in, true)?;
        LinearPhaseFit::fit(self.f(), &phase).ok_or(NetworkError::InsufficientPoints {
            needed: 2,
            got: self.nfreq(),
        })
    }

    /// Phase of `other` minus phase of `self`, in degrees, on `self`'s sweep
    ///
    /// When the sweeps differ, the phase of `other` is linearly interpolated
    /// onto `self`'s frequencies and held constant beyond its ends.
    pub fn phase_difference(
        &self,
        other: &Network,
        port_out: usize,
        port_in: usize,
        unwrap: bool,
    ) -> Result<Vec<f64>, NetworkError> {
        let reference = self.phase_deg(port_out, port_in, unwrap)?;
        let mut measured = other.phase_deg(port_out, port_in, unwrap)?;

        if other.f() != self.f() {
            measured = phase::interp(self.f(), other.f(), &measured);
        }

        Ok(measured
            .iter()
            .zip(&reference)
            .map(|(m, r)| m - r)
            .collect())
    }
}

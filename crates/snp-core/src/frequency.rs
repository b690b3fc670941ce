//! Frequency module - represents a frequency sweep
//!
//! Frequencies are stored in Hz. The unit is kept for display and for
//! reading option lines, never for arithmetic.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frequency sweep validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrequencyError {
    #[error("frequency sweep is empty")]
    Empty,

    #[error("frequency at index {index} is not finite")]
    NonFinite { index: usize },

    #[error(
        "frequencies must be strictly increasing: index {index} has {current} Hz after {previous} Hz"
    )]
    NotIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    /// Parse an option-line token (case-insensitive)
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            "mhz" => Some(FrequencyUnit::MHz),
            "ghz" => Some(FrequencyUnit::GHz),
            "thz" => Some(FrequencyUnit::THz),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
            FrequencyUnit::THz => "THz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sweep type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepType {
    #[default]
    Linear,
    Log,
}

/// A frequency sweep
///
/// A sweep built through [`Frequency::try_from_hz`] is guaranteed non-empty,
/// finite and strictly increasing. [`Frequency::validate`] checks the same
/// invariant for sweeps built any other way.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Display unit
    unit: FrequencyUnit,
    /// Sweep type (linear or log)
    sweep_type: SweepType,
}

impl Frequency {
    /// Create a new Frequency with start/stop/npoints
    ///
    /// # Arguments
    /// * `start` - Start frequency in the specified unit
    /// * `stop` - Stop frequency in the specified unit
    /// * `npoints` - Number of frequency points
    /// * `unit` - Frequency unit
    /// * `sweep_type` - Linear or logarithmic sweep
    ///
    /// # Example
    /// ```
    /// use snp_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear);
    /// assert_eq!(freq.npoints(), 10);
    /// ```
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: FrequencyUnit,
        sweep_type: SweepType,
    ) -> Self {
        let mult = unit.multiplier();
        let start_hz = start * mult;
        let stop_hz = stop * mult;

        let f = match (sweep_type, npoints) {
            (_, 0) => Vec::new(),
            (_, 1) => vec![start_hz],
            (SweepType::Linear, n) => {
                let step = (stop_hz - start_hz) / (n - 1) as f64;
                (0..n).map(|i| start_hz + i as f64 * step).collect()
            }
            (SweepType::Log, n) => {
                let log_start = start_hz.ln();
                let log_step = (stop_hz.ln() - log_start) / (n - 1) as f64;
                (0..n)
                    .map(|i| (log_start + i as f64 * log_step).exp())
                    .collect()
            }
        };

        Self {
            f,
            unit,
            sweep_type,
        }
    }

    /// Create from a frequency vector expressed in `unit` (unchecked)
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit) -> Self {
        let mult = unit.multiplier();
        Self {
            f: f.into_iter().map(|x| x * mult).collect(),
            unit,
            sweep_type: SweepType::Linear,
        }
    }

    /// Create from frequencies already in Hz, enforcing the sweep invariant
    pub fn try_from_hz(f: Vec<f64>, unit: FrequencyUnit) -> Result<Self, FrequencyError> {
        let freq = Self {
            f,
            unit,
            sweep_type: SweepType::Linear,
        };
        freq.validate()?;
        Ok(freq)
    }

    /// Check that the sweep is non-empty, finite and strictly increasing
    pub fn validate(&self) -> Result<(), FrequencyError> {
        if self.f.is_empty() {
            return Err(FrequencyError::Empty);
        }
        if let Some(index) = self.f.iter().position(|x| !x.is_finite()) {
            return Err(FrequencyError::NonFinite { index });
        }
        for (i, w) in self.f.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(FrequencyError::NotIncreasing {
                    index: i + 1,
                    previous: w[0],
                    current: w[1],
                });
            }
        }
        Ok(())
    }

    /// Keep the points selected by `keep`, preserving unit and sweep type
    pub(crate) fn select(&self, keep: &[usize]) -> Self {
        Self {
            f: keep.iter().map(|&i| self.f[i]).collect(),
            unit: self.unit,
            sweep_type: self.sweep_type,
        }
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Get frequency vector in the current unit
    pub fn f_scaled(&self) -> Vec<f64> {
        self.f_in(self.unit)
    }

    /// Get frequency vector in an arbitrary unit
    pub fn f_in(&self, unit: FrequencyUnit) -> Vec<f64> {
        let mult = unit.multiplier();
        self.f.iter().map(|&x| x / mult).collect()
    }

    /// Angular frequency 2πf in rad/s
    pub fn omega(&self) -> Vec<f64> {
        self.f.iter().map(|&x| 2.0 * PI * x).collect()
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Get the start frequency in Hz
    #[inline]
    pub fn start(&self) -> f64 {
        self.f.first().copied().unwrap_or(0.0)
    }

    /// Get the stop frequency in Hz
    #[inline]
    pub fn stop(&self) -> f64 {
        self.f.last().copied().unwrap_or(0.0)
    }

    /// Get the center frequency in Hz
    pub fn center(&self) -> f64 {
        (self.start() + self.stop()) / 2.0
    }

    /// Get the current unit
    #[inline]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Get the sweep type
    #[inline]
    pub fn sweep_type(&self) -> SweepType {
        self.sweep_type
    }

    /// Get the frequency span in Hz
    #[inline]
    pub fn span(&self) -> f64 {
        self.stop() - self.start()
    }
}

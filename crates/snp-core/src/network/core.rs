//! Core Network struct and constructors
//!
//! A `Network` is an immutable record of one parameter family sampled on a
//! frequency sweep. Conversions and derived quantities borrow it and return
//! new values.

use std::path::Path;

use ndarray::{s, Array3, Axis};
use num_complex::Complex64;

use super::error::NetworkError;
use super::params::ParameterFamily;
use crate::frequency::Frequency;
use crate::touchstone::{Touchstone, TouchstoneError};

/// An N-port electrical network
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Frequency sweep
    frequency: Frequency,
    /// Parameter data [nfreq, nports, nports]
    params: Array3<Complex64>,
    /// Real reference impedance shared by all ports
    z0: f64,
    /// Which parameter family `params` holds
    family: ParameterFamily,
    /// Network name
    name: Option<String>,
}

impl Network {
    /// Create a new Network
    ///
    /// Fails if the sweep is invalid, if the matrix count does not match the
    /// sweep, if the matrices are not square or if `z0` is not a positive
    /// finite number.
    pub fn new(
        frequency: Frequency,
        params: Array3<Complex64>,
        z0: f64,
        family: ParameterFamily,
    ) -> Result<Self, NetworkError> {
        frequency.validate()?;

        let (nfreq, rows, cols) = params.dim();
        if nfreq != frequency.npoints() {
            return Err(NetworkError::LengthMismatch {
                expected: frequency.npoints(),
                got: nfreq,
            });
        }
        if rows != cols {
            return Err(NetworkError::NotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(NetworkError::NoPorts);
        }
        if !(z0.is_finite() && z0 > 0.0) {
            return Err(NetworkError::InvalidReferenceImpedance(z0));
        }

        Ok(Self {
            frequency,
            params,
            z0,
            family,
            name: None,
        })
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Create from a Touchstone file
    pub fn from_touchstone<P: AsRef<Path>>(path: P) -> Result<Self, TouchstoneError> {
        Ok(Touchstone::from_file(path)?.network)
    }

    /// Create from Touchstone content held in memory
    ///
    /// `nports` is required for version 1 content, since the port count is
    /// normally implied by the file extension.
    pub fn from_touchstone_content(
        content: &str,
        nports: Option<usize>,
    ) -> Result<Self, TouchstoneError> {
        Ok(Touchstone::from_content(content, nports)?.network)
    }

    /// New record on the same sweep and reference impedance
    pub(crate) fn with_params(&self, params: Array3<Complex64>, family: ParameterFamily) -> Self {
        Self {
            frequency: self.frequency.clone(),
            params,
            z0: self.z0,
            family,
            name: self.name.clone(),
        }
    }

    pub(crate) fn check_port(&self, port: usize) -> Result<(), NetworkError> {
        if port < self.nports() {
            Ok(())
        } else {
            Err(NetworkError::IndexOutOfRange {
                port,
                nports: self.nports(),
            })
        }
    }

    /// Frequency sweep
    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Frequency vector in Hz
    pub fn f(&self) -> &[f64] {
        self.frequency.f()
    }

    /// Parameter data [nfreq, nports, nports]
    pub fn params(&self) -> &Array3<Complex64> {
        &self.params
    }

    /// Consume the record and return its parameter data
    pub fn into_params(self) -> Array3<Complex64> {
        self.params
    }

    /// Reference impedance
    pub fn z0(&self) -> f64 {
        self.z0
    }

    /// Parameter family held by this record
    pub fn family(&self) -> ParameterFamily {
        self.family
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of ports
    pub fn nports(&self) -> usize {
        self.params.dim().1
    }

    /// Number of frequency points
    pub fn nfreq(&self) -> usize {
        self.params.dim().0
    }

    /// The `[port_out, port_in]` entry across the whole sweep
    pub fn trace(&self, port_out: usize, port_in: usize) -> Result<Vec<Complex64>, NetworkError> {
        self.check_port(port_out)?;
        self.check_port(port_in)?;
        Ok(self.params.slice(s![.., port_out, port_in]).to_vec())
    }

    /// Keep only the points with `f_start <= f <= f_stop` (Hz)
    pub fn cropped(&self, f_start: f64, f_stop: f64) -> Result<Self, NetworkError> {
        let keep: Vec<usize> = self
            .f()
            .iter()
            .enumerate()
            .filter(|(_, f)| **f >= f_start && **f <= f_stop)
            .map(|(i, _)| i)
            .collect();

        if keep.is_empty() {
            return Err(NetworkError::EmptySweep {
                start: f_start,
                stop: f_stop,
            });
        }

        Ok(Self {
            frequency: self.frequency.select(&keep),
            params: self.params.select(Axis(0), &keep),
            z0: self.z0,
            family: self.family,
            name: self.name.clone(),
        })
    }
}

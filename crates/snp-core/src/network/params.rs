//! Network parameter families and conversion between them
//!
//! Every conversion is routed through S except Z <-> H and Y <-> G, which
//! use their closed-form pairwise formulas directly.

use std::fmt;

use ndarray::Array3;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::core::Network;
use super::error::NetworkError;
use crate::math::transforms::{
    abcd2s, g2s, g2y, h2s, h2z, s2abcd, s2g, s2h, s2t, s2y, s2z, t2s, y2g, y2s, z2h, z2s,
    ConversionError,
};

/// Network parameter family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterFamily {
    /// Scattering
    S,
    /// Impedance
    Z,
    /// Admittance
    Y,
    /// Hybrid
    H,
    /// Inverse hybrid
    G,
    /// Scattering transfer
    T,
    /// Chain
    #[serde(rename = "ABCD")]
    Abcd,
}

impl ParameterFamily {
    pub const ALL: [ParameterFamily; 7] = [
        ParameterFamily::S,
        ParameterFamily::Z,
        ParameterFamily::Y,
        ParameterFamily::H,
        ParameterFamily::G,
        ParameterFamily::T,
        ParameterFamily::Abcd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParameterFamily::S => "S",
            ParameterFamily::Z => "Z",
            ParameterFamily::Y => "Y",
            ParameterFamily::H => "H",
            ParameterFamily::G => "G",
            ParameterFamily::T => "T",
            ParameterFamily::Abcd => "ABCD",
        }
    }

    /// Whether the family only exists for 2-port networks
    pub fn is_two_port_only(&self) -> bool {
        matches!(
            self,
            ParameterFamily::H | ParameterFamily::G | ParameterFamily::T | ParameterFamily::Abcd
        )
    }
}

impl fmt::Display for ParameterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn to_s(
    p: &Array3<Complex64>,
    from: ParameterFamily,
    z0: f64,
) -> Result<Array3<Complex64>, ConversionError> {
    match from {
        ParameterFamily::S => Ok(p.clone()),
        ParameterFamily::Z => z2s(p, z0),
        ParameterFamily::Y => y2s(p, z0),
        ParameterFamily::H => h2s(p, z0),
        ParameterFamily::G => g2s(p, z0),
        ParameterFamily::T => t2s(p),
        ParameterFamily::Abcd => abcd2s(p, z0),
    }
}

fn from_s(
    s: &Array3<Complex64>,
    to: ParameterFamily,
    z0: f64,
) -> Result<Array3<Complex64>, ConversionError> {
    match to {
        ParameterFamily::S => Ok(s.clone()),
        ParameterFamily::Z => s2z(s, z0),
        ParameterFamily::Y => s2y(s, z0),
        ParameterFamily::H => s2h(s, z0),
        ParameterFamily::G => s2g(s, z0),
        ParameterFamily::T => s2t(s),
        ParameterFamily::Abcd => s2abcd(s, z0),
    }
}

impl Network {
    /// Convert to another parameter family
    ///
    /// The record's own reference impedance is used for every step.
    ///
    /// # Example
    /// ```
    /// use ndarray::Array3;
    /// use num_complex::Complex64;
    /// use snp_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// use snp_core::network::{Network, ParameterFamily};
    ///
    /// let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
    /// let s = Array3::from_elem((1, 1, 1), Complex64::new(0.5, 0.0));
    /// let ntwk = Network::new(freq, s, 50.0, ParameterFamily::S).unwrap();
    /// let z = ntwk.convert(ParameterFamily::Z).unwrap();
    /// assert!((z.params()[[0, 0, 0]].re - 150.0).abs() < 1e-9);
    /// ```
    pub fn convert(&self, target: ParameterFamily) -> Result<Network, NetworkError> {
        use ParameterFamily::{G, H, S, Y, Z};

        let p = self.params();
        let z0 = self.z0();
        let params = match (self.family(), target) {
            (from, to) if from == to => return Ok(self.clone()),
            (Z, H) => z2h(p)?,
            (H, Z) => h2z(p)?,
            (Y, G) => y2g(p)?,
            (G, Y) => g2y(p)?,
            (S, to) => from_s(p, to, z0)?,
            (from, S) => to_s(p, from, z0)?,
            (from, to) => from_s(&to_s(p, from, z0)?, to, z0)?,
        };

        Ok(self.with_params(params, target))
    }

    /// Convert to S-parameters
    pub fn to_s(&self) -> Result<Network, NetworkError> {
        self.convert(ParameterFamily::S)
    }

    /// Z-parameters
    pub fn z(&self) -> Result<Array3<Complex64>, NetworkError> {
        Ok(self.convert(ParameterFamily::Z)?.into_params())
    }

    /// Y-parameters
    pub fn y(&self) -> Result<Array3<Complex64>, NetworkError> {
        Ok(self.convert(ParameterFamily::Y)?.into_params())
    }

    /// ABCD (chain) parameters, 2-port only
    pub fn abcd(&self) -> Result<Array3<Complex64>, NetworkError> {
        Ok(self.convert(ParameterFamily::Abcd)?.into_params())
    }
}

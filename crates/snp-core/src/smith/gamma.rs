//! Reflection coefficient transforms
//!
//! All impedances and admittances here are normalized to the reference
//! impedance unless a function says otherwise. Inputs at the pole of a
//! transform (z = -1, Γ = 1, ...) produce non-finite results rather than
//! errors.

use ndarray::Array3;
use num_complex::Complex64;
use thiserror::Error;

use crate::constants::NEAR_ZERO;
use crate::frequency::Frequency;
use crate::network::{Network, NetworkError, ParameterFamily};

/// Smith chart transform errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmithError {
    #[error("reference impedance {0} is too close to zero")]
    ZeroReferenceImpedance(Complex64),
}

const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Γ = (z - 1) / (z + 1)
pub fn z_to_gamma(z: Complex64) -> Complex64 {
    (z - ONE) / (z + ONE)
}

/// z = (1 + Γ) / (1 - Γ)
pub fn gamma_to_z(gamma: Complex64) -> Complex64 {
    (ONE + gamma) / (ONE - gamma)
}

/// Γ = (1 - y) / (1 + y)
pub fn y_to_gamma(y: Complex64) -> Complex64 {
    (ONE - y) / (ONE + y)
}

/// y = (1 - Γ) / (1 + Γ)
pub fn gamma_to_y(gamma: Complex64) -> Complex64 {
    (ONE - gamma) / (ONE + gamma)
}

fn check_reference(z0: Complex64) -> Result<Complex64, SmithError> {
    if z0.norm() < NEAR_ZERO {
        Err(SmithError::ZeroReferenceImpedance(z0))
    } else {
        Ok(z0)
    }
}

/// Divide an impedance in ohms by the reference impedance
pub fn normalize_impedance(z: Complex64, z0: Complex64) -> Result<Complex64, SmithError> {
    Ok(z / check_reference(z0)?)
}

/// Multiply a normalized impedance by the reference impedance
pub fn denormalize_impedance(z: Complex64, z0: Complex64) -> Result<Complex64, SmithError> {
    Ok(z * check_reference(z0)?)
}

/// Build a 1-port S-parameter network from a reflection coefficient trace
pub fn gamma_to_network(
    gammas: &[Complex64],
    frequency: Frequency,
    z0: f64,
) -> Result<Network, NetworkError> {
    let s = Array3::from_shape_fn((gammas.len(), 1, 1), |(f, _, _)| gammas[f]);
    Network::new(frequency, s, z0, ParameterFamily::S)
}

impl Network {
    /// Reflection coefficient trace `S[port1, port2]` for Smith chart display
    ///
    /// Off-diagonal entries are allowed and returned as-is.
    pub fn gamma(&self, port1: usize, port2: usize) -> Result<Vec<Complex64>, NetworkError> {
        if self.family() != ParameterFamily::S {
            return Err(NetworkError::WrongFamily {
                expected: ParameterFamily::S,
                found: self.family(),
            });
        }
        self.trace(port1, port2)
    }
}

/// A reflection coefficient with its chart coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionPoint {
    pub gamma: Complex64,
    pub x: f64,
    pub y: f64,
}

impl ReflectionPoint {
    pub fn new(gamma: Complex64) -> Self {
        Self {
            gamma,
            x: gamma.re,
            y: gamma.im,
        }
    }

    pub fn from_xy(x: f64, y: f64) -> Self {
        Self::new(Complex64::new(x, y))
    }

    pub fn magnitude(&self) -> f64 {
        self.gamma.norm()
    }

    /// Pull points outside the unit circle back onto it, keeping the angle
    pub fn clipped(self) -> Self {
        let mag = self.magnitude();
        if mag > 1.0 {
            Self::new(self.gamma / mag)
        } else {
            self
        }
    }

    /// Normalized impedance at this point
    pub fn impedance(&self) -> Complex64 {
        gamma_to_z(self.gamma)
    }

    /// Normalized admittance at this point
    pub fn admittance(&self) -> Complex64 {
        gamma_to_y(self.gamma)
    }
}

/// Map a reflection coefficient trace to chart points
pub fn reflection_points(gammas: &[Complex64], clip: bool) -> Vec<ReflectionPoint> {
    gammas
        .iter()
        .map(|&g| {
            let point = ReflectionPoint::new(g);
            if clip {
                point.clipped()
            } else {
                point
            }
        })
        .collect()
}

//! Network errors

use thiserror::Error;

use super::params::ParameterFamily;
use crate::frequency::FrequencyError;
use crate::math::transforms::ConversionError;

/// Errors raised while building or querying a [`super::Network`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("invalid frequency sweep: {0}")]
    Frequency(#[from] FrequencyError),

    #[error("parameter data has {got} frequency points but the sweep has {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("parameter matrices must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("network must have at least one port")]
    NoPorts,

    #[error("reference impedance must be positive and finite, got {0}")]
    InvalidReferenceImpedance(f64),

    #[error("port index {port} out of range for a {nports}-port network")]
    IndexOutOfRange { port: usize, nports: usize },

    #[error("need at least {needed} frequency points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("no frequency points between {start} Hz and {stop} Hz")]
    EmptySweep { start: f64, stop: f64 },

    #[error("expected {expected} parameters, found {found}")]
    WrongFamily {
        expected: ParameterFamily,
        found: ParameterFamily,
    },
}

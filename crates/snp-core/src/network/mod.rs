//! Network module - N-port electrical network representation
//!
//! Provides the core Network record, conversion between parameter families
//! and derived quantities such as group delay.

mod core;
mod derived;
mod error;
mod params;

pub use self::core::Network;
pub use derived::{LinearPhaseFit, PhaseErrorStats};
pub use error::NetworkError;
pub use params::ParameterFamily;

//! snp-core: RF network-parameter engine
//!
//! Parses Touchstone files into frequency-indexed complex matrices, converts
//! between network parameter families, and derives the scalar traces and
//! Smith chart geometry a plotting front end needs.
//!
//! ## Modules
//!
//! - `frequency` - Frequency sweep representation
//! - `math` - Unit conversions, parameter transforms, phase utilities
//! - `touchstone` - Touchstone v1/v2 parsing
//! - `network` - N-port network record, conversions and derived metrics
//! - `smith` - Reflection coefficients, grid generation, unit-circle geometry
//!
//! ## Example
//! ```no_run
//! use snp_core::{parse, ParameterFamily};
//!
//! let ts = parse("amplifier.s2p")?;
//! let z = ts.network.convert(ParameterFamily::Z)?;
//! let delay = ts.network.group_delay(1, 0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

pub mod constants;
pub mod frequency;
pub mod math;
pub mod network;
pub mod smith;
pub mod touchstone;

pub use frequency::Frequency;
pub use network::{Network, NetworkError, ParameterFamily};
pub use smith::{smith_grid, GridMode};
pub use touchstone::{Touchstone, TouchstoneError};

/// Parse a Touchstone file into a network record and its metadata
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Touchstone, TouchstoneError> {
    Touchstone::from_file(path)
}
